use std::env;

/// Fallback used outside production when SESSION_SECRET is not set
const DEV_SESSION_SECRET: &str = "crafting-server-development-secret";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub session_secret: String,
    pub environment: String,
    pub rate_limit_requests: u64,
    pub rate_limit_window_secs: i64,
    pub seed_database: bool,
    pub static_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid PORT")?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/crafting.db".to_string());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "Invalid DATABASE_MAX_CONNECTIONS")?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment == "production" => {
                return Err("SESSION_SECRET must be set in production".to_string());
            }
            _ => {
                tracing::warn!("SESSION_SECRET not set, using the development fallback");
                DEV_SESSION_SECRET.to_string()
            }
        };

        let rate_limit_requests = env::var("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| "Invalid RATE_LIMIT_REQUESTS")?;

        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|_| "Invalid RATE_LIMIT_WINDOW_SECS")?;

        let seed_database = env::var("SEED_DATABASE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| "Invalid SEED_DATABASE (expected true or false)")?;

        let static_dir = env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty());

        Ok(Config {
            server_host,
            server_port,
            database_url,
            database_max_connections,
            frontend_url,
            session_secret,
            environment,
            rate_limit_requests,
            rate_limit_window_secs,
            seed_database,
            static_dir,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Secure cookies are only issued in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
