use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use crate::errors::{AppResult, StoreError};
use crate::models::User;
use super::credentials::Credentials;
use super::store::{load_json, save_json, DocumentStore, Keys};

#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DocumentStore>,
    keys: Keys,
    credentials: Credentials,
}

impl UserStore {
    pub fn new(store: Arc<dyn DocumentStore>, keys: Keys, credentials: Credentials) -> Self {
        Self { store, keys, credentials }
    }

    /// Hashes the password and persists a new user. The email claim is taken
    /// first so two concurrent signups cannot both succeed.
    pub async fn create(&self, email: &str, password: &str, name: Option<String>) -> AppResult<User> {
        let password_hash = self
            .credentials
            .hash_password_blocking(password.to_string())
            .await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let email_key = self.keys.user_email(email);
        if !self.store.put_if_absent(&email_key, &user.id.to_string()).await? {
            return Err(StoreError::Duplicate("Email already registered".into()).into());
        }

        if let Err(e) = save_json(self.store.as_ref(), &self.keys.user(&user.id), &user).await {
            // Release the email so the address is not locked out
            let _ = self.store.delete(&email_key).await;
            return Err(e.into());
        }

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.store.get(&self.keys.user_email(email)).await? else {
            return Ok(None);
        };
        match Uuid::parse_str(&id) {
            Ok(id) => self.find_by_id(&id).await,
            Err(_) => {
                tracing::warn!("Email index for {} holds a malformed id", email);
                Ok(None)
            }
        }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        Ok(load_json(self.store.as_ref(), &self.keys.user(id)).await?)
    }

    /// None on unknown email and on wrong password alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let verified = self
            .credentials
            .verify_password_blocking(password.to_string(), user.password_hash.clone())
            .await?;

        Ok(verified.then_some(user))
    }
}
