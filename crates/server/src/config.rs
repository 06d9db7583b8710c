use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:./data/travel-buddy.db`
    pub url: String,
    pub max_connections: u32,
    /// Insert the demo user, trip and conversation into an empty database
    pub seed_demo_data: bool,
    /// Abort startup when seeding fails instead of logging and continuing
    pub seed_failure_fatal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Identity used when a request carries no credentials or `user-id` header
    pub demo_user_id: String,
    /// When set, login and register issue signed JWTs instead of demo tokens
    pub jwt_secret: Option<String>,
    pub token_expiry_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/travel-buddy.db".to_string(),
            max_connections: 5,
            seed_demo_data: true,
            seed_failure_fatal: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_user_id: "demo-user-id".to_string(),
            jwt_secret: None,
            token_expiry_hours: 24,
        }
    }
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(explicit)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        // Try to load from environment variable
        if let Ok(path) = std::env::var("TRAVEL_BUDDY_CONFIG") {
            return Self::load_from_path(&PathBuf::from(path));
        }

        // Try to load from default locations
        let default_paths = [
            PathBuf::from("travel-buddy.toml"),
            PathBuf::from("config/travel-buddy.toml"),
            PathBuf::from("/etc/travel-buddy/server.toml"),
        ];

        for path in default_paths {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `PORT` and `DATABASE_URL` win over the file.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        Ok(())
    }
}
