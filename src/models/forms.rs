// Request payloads. Shape is enforced by serde; field constraints by `validate`.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use super::{LabelPatch, Priority, TaskPatch, TaskStatus};

const MIN_PASSWORD_LEN: usize = 6;
const MAX_LABEL_NAME_LEN: usize = 50;
const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

// Distinguishes an absent key (None) from an explicit null (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLabel {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateLabel {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub label_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub label_ids: Option<Vec<Uuid>>,
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

fn check_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("email is not a valid email address"))
    }
}

fn check_color(color: &str) -> AppResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("color must be a hex color like #FF5733"))
    }
}

impl SignupForm {
    pub fn validate(&self) -> AppResult<()> {
        check_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

impl LoginForm {
    pub fn validate(&self) -> AppResult<()> {
        check_email(&self.email)
    }
}

impl CreateLabel {
    pub fn validate(&self) -> AppResult<()> {
        check_len("name", &self.name, 1, MAX_LABEL_NAME_LEN)?;
        if let Some(color) = &self.color {
            check_color(color)?;
        }
        Ok(())
    }
}

impl UpdateLabel {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            check_len("name", name, 1, MAX_LABEL_NAME_LEN)?;
        }
        if let Some(Some(color)) = &self.color {
            check_color(color)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> LabelPatch {
        LabelPatch {
            name: self.name,
            color: self.color,
        }
    }
}

impl CreateTask {
    pub fn validate(&self) -> AppResult<()> {
        check_len("title", &self.title, 1, MAX_TITLE_LEN)?;
        if let Some(description) = &self.description {
            check_len("description", description, 0, MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }
}

impl UpdateTask {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(title) = &self.title {
            check_len("title", title, 1, MAX_TITLE_LEN)?;
        }
        if let Some(Some(description)) = &self.description {
            check_len("description", description, 0, MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: self.title,
            description: self.description,
            priority: self.priority,
            deadline: self.deadline,
            status: self.status,
            label_ids: self.label_ids,
        }
    }
}
