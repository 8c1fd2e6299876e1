// Application error taxonomy, built on thiserror. HTTP mapping lives in response.rs.
use thiserror::Error;

pub mod response;
pub mod store;

pub use store::{StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum AppError {
    // Malformed input: bad id format, field constraint violations, unparsable bodies
    #[error("Validation error: {0}")]
    Validation(String),

    // Missing/invalid/expired token or bad credentials. The message is what the client sees.
    #[error("Authentication error: {0}")]
    Auth(String),

    // Entity absent or owned by someone else; the two are never distinguished
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// The single client-facing authentication failure used by the access gate.
    pub fn credentials() -> Self {
        AppError::Auth("Could not validate credentials".into())
    }
}

// Uniqueness violations surface as DuplicateKey; everything else from storage is internal.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::DuplicateKey(msg),
            other => AppError::Store(other),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        // Parser detail stays in the log
        tracing::debug!(status = rejection.status().as_u16(), "rejected request body: {}", rejection.body_text());
        AppError::Validation("Validation error".into())
    }
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
