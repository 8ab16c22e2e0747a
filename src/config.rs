use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // PostgreSQL
    pub database_url: String,
    pub db_max_connections: u32,

    // Music info provider
    pub music_info_url: String,

    // Outbound HTTP (provider requests and link probes)
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            // PostgreSQL
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/songlib".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),

            // Music info provider
            music_info_url: env::var("MUSIC_INFO_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),

            // Outbound HTTP
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }
}
