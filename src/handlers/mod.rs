mod auth;
mod task;
mod label;
mod health;

use uuid::Uuid;
use crate::errors::{AppError, AppResult};

pub use auth::{current_user, handle_login, handle_logout, handle_signup};
pub use task::{create_task, delete_task, get_task, list_tasks, list_tasks_by_label, update_task};
pub use label::{create_label, delete_label, get_label, list_labels, update_label};
pub use health::{healthz, readyz};

// Path ids are UUIDs; anything else is a malformed request, not a missing entity
pub(crate) fn parse_id(raw: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("Invalid {} ID format", entity)))
}
