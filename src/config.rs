use std::str::FromStr;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    // Namespace for every key this service writes
    pub database: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub token_ttl_minutes: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
}

impl Config {
    /// Defaults, then `config/default.*` if present, then `APP_*` environment
    /// variables (`APP_AUTH__JWT_SECRET` sets `auth.jwt_secret`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("storage.backend", "redis")?
            .set_default("storage.url", "redis://127.0.0.1:6379")?
            .set_default("storage.database", "todo_app")?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.jwt_algorithm", "HS256")?
            .set_default("auth.token_ttl_minutes", 30)?
            .set_default("auth.cookie_name", "access_token")?
            .set_default("auth.cookie_secure", true)?
            .set_default("auth.bcrypt_cost", bcrypt::DEFAULT_COST as i64)?
            .set_default("service.name", "Todo App")?
            .set_default("service.version", env!("CARGO_PKG_VERSION"))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret must be set (APP_AUTH__JWT_SECRET)".into(),
            ));
        }
        self.auth.algorithm()?;
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(config::ConfigError::Message(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        if self.auth.token_ttl_minutes < 0 {
            return Err(config::ConfigError::Message(
                "auth.token_ttl_minutes must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl AuthConfig {
    /// Tokens are signed with a shared secret, so only the HMAC family is accepted.
    pub fn algorithm(&self) -> Result<Algorithm, config::ConfigError> {
        let algorithm = Algorithm::from_str(&self.jwt_algorithm).map_err(|e| {
            config::ConfigError::Message(format!(
                "unknown jwt algorithm {}: {}",
                self.jwt_algorithm, e
            ))
        })?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            other => Err(config::ConfigError::Message(format!(
                "jwt algorithm {:?} needs a key pair; use HS256, HS384 or HS512",
                other
            ))),
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

#[cfg(test)]
impl Config {
    /// In-memory configuration with a cheap bcrypt cost.
    pub fn for_tests() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                url: String::new(),
                database: "test".into(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".into(),
                jwt_algorithm: "HS256".into(),
                token_ttl_minutes: 30,
                cookie_name: "access_token".into(),
                cookie_secure: false,
                bcrypt_cost: 4,
            },
            service: ServiceConfig {
                name: "Todo App".into(),
                version: "test".into(),
            },
        }
    }
}
