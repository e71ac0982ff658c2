use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty or `["*"]` allows any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// JSON file with the movie catalogue, inserted on startup if missing.
    pub movies_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3222)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_secs", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FILMTWEET__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("FILMTWEET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
