//! Configuration module
//!
//! Environment-driven configuration for the API server. All knobs have
//! sensible defaults except `DATABASE_URL` and `JWT_SECRET`, which must be
//! set explicitly.

use std::env;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const SERVER_PORT: u16 = 4000;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
    /// Base URL prefixed to `/{slug}` when building public booking links
    /// (campaign messages, confirmation payloads).
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Public booking page URL for a business slug.
    pub fn booking_url(&self, slug: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), slug)
    }

    /// Fail fast on values that would only blow up at request time.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters, got {}",
                self.jwt_secret.len()
            ));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/prenoto".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_expiry_hours: 24,
            environment: "development".to_string(),
            public_base_url: "https://prenoto.example".to_string(),
        }
    }

    #[test]
    fn test_booking_url_joins_slug() {
        let config = test_config();
        assert_eq!(
            config.booking_url("salone-da-anna"),
            "https://prenoto.example/salone-da-anna"
        );
    }

    #[test]
    fn test_booking_url_trims_trailing_slash() {
        let mut config = test_config();
        config.public_base_url = "https://prenoto.example/".to_string();
        assert_eq!(
            config.booking_url("barber-bros"),
            "https://prenoto.example/barber-bros"
        );
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = test_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
