use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Location of the JSON document holding `users` and `records`
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
}

const DEV_JWT_SECRET: &str = "recordkeeper-development-secret";

/// Upper bound on token lifetime (ten years)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("RECORDKEEPER_DB_PATH") {
            self.store.db_path = PathBuf::from(v);
        }

        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = parse_expiry_hours(&v, self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            store: StoreConfig {
                db_path: PathBuf::from("db.json"),
            },
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:5173".to_string(),
                    "http://127.0.0.1:5173".to_string(),
                ],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 1,
                bcrypt_cost: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            store: StoreConfig {
                db_path: PathBuf::from("db.json"),
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                // Must be supplied through SECURITY_JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                bcrypt_cost: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            store: StoreConfig {
                db_path: PathBuf::from("db.json"),
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                bcrypt_cost: 12,
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Development
        )
    };
}

/// Parse a token lifetime, clamped to `1..=MAX_JWT_EXPIRY_HOURS`
fn parse_expiry_hours(value: &str, fallback: u64) -> u64 {
    match value.trim().parse::<u64>() {
        Ok(hours) => hours.clamp(1, MAX_JWT_EXPIRY_HOURS),
        Err(_) => {
            tracing::warn!("Ignoring invalid SECURITY_JWT_EXPIRY_HOURS '{}'", value);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_hours_are_clamped() {
        assert_eq!(parse_expiry_hours("12", 1), 12);
        assert_eq!(parse_expiry_hours("0", 1), 1);
        assert_eq!(parse_expiry_hours("99999999999999999", 1), MAX_JWT_EXPIRY_HOURS);
        assert_eq!(parse_expiry_hours("soon", 24), 24);
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.store.db_path, PathBuf::from("db.json"));
        assert!(config
            .security
            .cors_origins
            .contains(&"http://localhost:5173".to_string()));
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.is_development());
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }
}
