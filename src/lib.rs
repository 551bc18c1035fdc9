//! Crafting Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod security;
pub mod services;
pub mod session;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use routes::app_router;

use middleware::RateLimiter;
use session::SessionStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub sessions: SessionStore,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        let rate_limiter =
            RateLimiter::new(config.rate_limit_requests, config.rate_limit_window_secs);

        Self {
            db,
            config,
            sessions: SessionStore::new(),
            rate_limiter,
        }
    }
}
