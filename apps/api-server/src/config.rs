//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Base URL used when composing reset links.
    pub public_base_url: String,
    /// Directory where profile pictures are stored.
    pub avatar_dir: String,
    pub admin: Option<AdminConfig>,
}

/// Startup provisioning for the single admin account.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let admin = env::var("ADMIN_NAME").ok().and_then(|name| {
            let password = env::var("ADMIN_PASSWORD").unwrap_or_default();
            if password.is_empty() {
                tracing::warn!("ADMIN_NAME is set but ADMIN_PASSWORD is empty; skipping");
                return None;
            }
            Some(AdminConfig {
                name,
                nickname: env::var("ADMIN_NICKNAME").unwrap_or_else(|_| "admin".to_string()),
                email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
                password,
            })
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            avatar_dir: env::var("AVATAR_DIR")
                .unwrap_or_else(|_| "static/profile_pics".to_string()),
            admin,
        }
    }
}
