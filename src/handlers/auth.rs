use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};
use crate::middleware::{CurrentUser, OptionalUser};
use crate::models::{LoginForm, SignupForm, User, UserProfile};
use crate::state::AppState;

fn session_cookie(auth: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(auth.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(auth.token_ttl_minutes))
        .build()
}

// Issues a token for `user` and attaches it as the session cookie
fn start_session(state: &AppState, jar: CookieJar, user: &User) -> AppResult<CookieJar> {
    let token = state
        .credentials
        .issue_token(&user.id.to_string(), state.credentials.default_ttl())?;
    Ok(jar.add(session_cookie(&state.config.auth, token)))
}

pub async fn handle_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Json<SignupForm>, JsonRejection>,
) -> AppResult<Response> {
    let Json(form) = form?;
    form.validate()?;

    if state.users.find_by_email(&form.email).await?.is_some() {
        tracing::info!("Signup rejected: email already registered");
        return Err(AppError::DuplicateKey("Email already registered".into()));
    }

    let user = state.users.create(&form.email, &form.password, form.name).await?;
    let jar = start_session(&state, jar, &user)?;

    tracing::info!("User {} signed up", user.id);
    Ok((StatusCode::CREATED, jar, Json(UserProfile::from(user))).into_response())
}

pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Json<LoginForm>, JsonRejection>,
) -> AppResult<Response> {
    let Json(form) = form?;
    form.validate()?;

    let user = state
        .users
        .authenticate(&form.email, &form.password)
        .await?
        .ok_or_else(|| AppError::Auth("Incorrect email or password".into()))?;

    let jar = start_session(&state, jar, &user)?;

    tracing::info!("User {} logged in", user.id);
    Ok((jar, Json(UserProfile::from(user))).into_response())
}

pub async fn handle_logout(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    match user {
        Some(user) => tracing::info!("User {} logged out", user.id),
        None => tracing::debug!("Logout without a valid session"),
    }

    // Sent unconditionally: the jar only emits removals for cookies present on the request
    let mut removal = Cookie::build((state.config.auth.cookie_name.clone(), ""))
        .path("/")
        .build();
    removal.make_removal();
    (
        jar.add(removal),
        Json(json!({ "message": "Successfully logged out" })),
    )
        .into_response()
}

pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}
