use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{CreateTask, Task, UpdateTask};
use crate::state::AppState;
use super::parse_id;

// Every referenced label must resolve for `owner`. Checked before any write so
// a bad reference leaves the task store untouched.
async fn ensure_labels_owned(state: &AppState, owner: &Uuid, label_ids: &[Uuid]) -> AppResult<()> {
    for label_id in label_ids {
        if state.labels.get(label_id, owner).await?.is_none() {
            return Err(AppError::validation(format!(
                "Label with id {} not found or does not belong to user",
                label_id
            )));
        }
    }
    Ok(())
}

pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(&user.id).await?;
    tracing::debug!("Listing {} tasks for user {}", tasks.len(), user.id);
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let Json(payload) = payload?;
    payload.validate()?;
    ensure_labels_owned(&state, &user.id, &payload.label_ids).await?;

    let task = state.tasks.create(payload, &user.id).await?;
    tracing::info!("User {} created task {}", user.id, task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> AppResult<Json<Task>> {
    let task_id = parse_id(&task_id, "task")?;

    let task = state
        .tasks
        .get(&task_id, &user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;

    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let task_id = parse_id(&task_id, "task")?;
    let Json(payload) = payload?;
    payload.validate()?;

    if let Some(label_ids) = &payload.label_ids {
        ensure_labels_owned(&state, &user.id, label_ids).await?;
    }

    let task = state
        .tasks
        .update(&task_id, &user.id, payload.into_patch())
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;

    tracing::info!("User {} updated task {}", user.id, task.id);
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> AppResult<StatusCode> {
    let task_id = parse_id(&task_id, "task")?;

    if !state.tasks.delete(&task_id, &user.id).await? {
        return Err(AppError::not_found("Task not found"));
    }

    tracing::info!("User {} deleted task {}", user.id, task_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tasks_by_label(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(label_id): Path<String>,
) -> AppResult<Json<Vec<Task>>> {
    let label_id = parse_id(&label_id, "label")?;

    if state.labels.get(&label_id, &user.id).await?.is_none() {
        return Err(AppError::not_found("Label not found"));
    }

    Ok(Json(state.tasks.list_by_label(&user.id, &label_id).await?))
}
