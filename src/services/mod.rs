//! Validation and business rules on top of the repositories.
//!
//! Mutating operations take the acting [`User`](crate::models::User)
//! resolved from the request's session.

pub mod auth;
pub mod inventory;
pub mod items;
pub mod recipes;
pub mod users;
