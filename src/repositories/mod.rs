//! Raw SQL access, one module per table group.
//!
//! Every function takes a `&mut SqliteConnection` so callers decide whether
//! it runs on a pooled connection or inside a transaction.

pub mod inventory;
pub mod items;
pub mod recipes;
pub mod users;
