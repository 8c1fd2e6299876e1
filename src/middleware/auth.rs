use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;

/// Identity resolved by `require_auth`, available to handlers as an extractor.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Identity if the request carries a valid token, otherwise `None`.
#[derive(Clone, Debug)]
pub struct OptionalUser(pub Option<User>);

/// Bearer header first, then the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Token → claims → subject → user. Every failure is the same credentials error.
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> AppResult<User> {
    let token = extract_token(headers, &state.config.auth.cookie_name).ok_or_else(|| {
        tracing::debug!("No token on request");
        AppError::credentials()
    })?;

    let claims = state.credentials.verify_token(&token)?;

    let user_id = claims
        .sub
        .as_deref()
        .and_then(|sub| Uuid::parse_str(sub).ok())
        .ok_or_else(|| {
            tracing::debug!("Token has no usable subject");
            AppError::credentials()
        })?;

    state.users.find_by_id(&user_id).await?.ok_or_else(|| {
        tracing::debug!("Token subject {} has no account", user_id);
        AppError::credentials()
    })
}

/// Like `resolve_identity`, but an authentication failure yields `None`.
/// Storage failures still propagate.
pub async fn resolve_optional_identity(state: &AppState, headers: &HeaderMap) -> AppResult<Option<User>> {
    match resolve_identity(state, headers).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::Auth(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_identity(&state, req.headers()).await?;
    tracing::debug!("Authenticated user {}", user.id);

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    // Fails closed on routes that are not behind `require_auth`
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::credentials)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(user)) = parts.extensions.get::<CurrentUser>() {
            return Ok(OptionalUser(Some(user.clone())));
        }
        Ok(OptionalUser(resolve_optional_identity(state, &parts.headers).await?))
    }
}
