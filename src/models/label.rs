use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Label {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-level changes to a label. `None` leaves a field untouched;
/// `color: Some(None)` clears the color.
#[derive(Debug, Default, Clone)]
pub struct LabelPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
}

impl LabelPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

impl Label {
    pub fn new(user_id: Uuid, name: String, color: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            color,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the patch and refreshes `updated_at`. Returns false for an empty patch.
    pub fn apply(&mut self, patch: LabelPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.updated_at = Utc::now();
        true
    }
}
