use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    // Optional so a token without a subject decodes and is rejected by the gate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Password hashing and bearer-token signing. Cheap to clone.
#[derive(Clone)]
pub struct Credentials {
    keys: Arc<Keys>,
    algorithm: Algorithm,
    bcrypt_cost: u32,
    default_ttl: Duration,
}

impl Credentials {
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let algorithm = config
            .algorithm()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let secret = config.jwt_secret.as_bytes();

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            algorithm,
            bcrypt_cost: config.bcrypt_cost,
            default_ttl: config.token_ttl(),
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// False on mismatch and on a malformed hash; wrong passwords are never errors.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    // Runs on the blocking pool
    pub async fn hash_password_blocking(&self, password: String) -> AppResult<String> {
        let credentials = self.clone();
        tokio::task::spawn_blocking(move || credentials.hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task panicked: {}", e)))?
    }

    pub async fn verify_password_blocking(&self, password: String, hash: String) -> AppResult<bool> {
        let credentials = self.clone();
        tokio::task::spawn_blocking(move || credentials.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task panicked: {}", e)))
    }

    pub fn issue_token(&self, subject: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.keys.encoding)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Rejects bad signatures, malformed tokens and expired tokens alike.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::credentials()
        })?;

        // jsonwebtoken accepts exp == now; a token is expired once its second arrives
        if data.claims.exp <= Utc::now().timestamp() {
            tracing::debug!("Token rejected: expired");
            return Err(AppError::credentials());
        }

        Ok(data.claims)
    }
}
