mod auth;

pub use auth::{
    extract_token, require_auth, resolve_identity, resolve_optional_identity, CurrentUser,
    OptionalUser,
};
