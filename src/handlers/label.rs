use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{CreateLabel, Label, UpdateLabel};
use crate::state::AppState;
use super::parse_id;

pub async fn list_labels(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Label>>> {
    Ok(Json(state.labels.list(&user.id).await?))
}

pub async fn create_label(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateLabel>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Label>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let label = state.labels.create(payload, &user.id).await?;
    tracing::info!("User {} created label {}", user.id, label.id);
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn get_label(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(label_id): Path<String>,
) -> AppResult<Json<Label>> {
    let label_id = parse_id(&label_id, "label")?;

    state
        .labels
        .get(&label_id, &user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Label not found"))
}

pub async fn update_label(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(label_id): Path<String>,
    payload: Result<Json<UpdateLabel>, JsonRejection>,
) -> AppResult<Json<Label>> {
    let label_id = parse_id(&label_id, "label")?;
    let Json(payload) = payload?;
    payload.validate()?;

    let label = state
        .labels
        .update(&label_id, &user.id, payload.into_patch())
        .await?
        .ok_or_else(|| AppError::not_found("Label not found"))?;

    tracing::info!("User {} updated label {}", user.id, label.id);
    Ok(Json(label))
}

pub async fn delete_label(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(label_id): Path<String>,
) -> AppResult<StatusCode> {
    let label_id = parse_id(&label_id, "label")?;

    if !state.labels.delete(&label_id, &user.id).await? {
        return Err(AppError::not_found("Label not found"));
    }

    tracing::info!("User {} deleted label {}", user.id, label_id);
    Ok(StatusCode::NO_CONTENT)
}
