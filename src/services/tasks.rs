use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use crate::errors::AppResult;
use crate::models::{CreateTask, Task, TaskPatch};
use super::store::{load_json, save_json, DocumentStore, Keys};

#[derive(Clone)]
pub struct TaskStore {
    store: Arc<dyn DocumentStore>,
    keys: Keys,
}

impl TaskStore {
    pub fn new(store: Arc<dyn DocumentStore>, keys: Keys) -> Self {
        Self { store, keys }
    }

    /// Label references must already be validated by the caller.
    pub async fn create(&self, payload: CreateTask, owner: &Uuid) -> AppResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: *owner,
            title: payload.title,
            description: payload.description,
            priority: payload.priority,
            deadline: payload.deadline,
            status: payload.status,
            label_ids: payload.label_ids,
            created_at: now,
            updated_at: now,
        };

        save_json(self.store.as_ref(), &self.keys.task(&task.id), &task).await?;
        self.store
            .set_add(&self.keys.user_tasks(owner), &task.id.to_string())
            .await?;

        tracing::debug!("Created task {} for user {}", task.id, owner);
        Ok(task)
    }

    /// Newest first.
    pub async fn list(&self, owner: &Uuid) -> AppResult<Vec<Task>> {
        let ids = self.store.set_members(&self.keys.user_tasks(owner)).await?;
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let Ok(id) = Uuid::parse_str(&id) else {
                tracing::warn!("Skipping malformed task id {} for user {}", id, owner);
                continue;
            };
            if let Some(task) = self.get(&id, owner).await? {
                tasks.push(task);
            }
        }
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(tasks)
    }

    /// Newest first, restricted to tasks carrying `label_id`.
    pub async fn list_by_label(&self, owner: &Uuid, label_id: &Uuid) -> AppResult<Vec<Task>> {
        let mut tasks = self.list(owner).await?;
        tasks.retain(|task| task.has_label(label_id));
        Ok(tasks)
    }

    /// None when the task is missing or belongs to someone else.
    pub async fn get(&self, id: &Uuid, owner: &Uuid) -> AppResult<Option<Task>> {
        let task: Option<Task> = load_json(self.store.as_ref(), &self.keys.task(id)).await?;
        Ok(task.filter(|task| &task.user_id == owner))
    }

    pub async fn update(&self, id: &Uuid, owner: &Uuid, patch: TaskPatch) -> AppResult<Option<Task>> {
        let Some(mut task) = self.get(id, owner).await? else {
            return Ok(None);
        };
        if !task.apply(patch) {
            return Ok(Some(task));
        }

        save_json(self.store.as_ref(), &self.keys.task(id), &task).await?;
        tracing::debug!("Updated task {} for user {}", id, owner);
        Ok(Some(task))
    }

    pub async fn delete(&self, id: &Uuid, owner: &Uuid) -> AppResult<bool> {
        if self.get(id, owner).await?.is_none() {
            return Ok(false);
        }

        let removed = self.store.delete(&self.keys.task(id)).await?;
        self.store
            .set_remove(&self.keys.user_tasks(owner), &id.to_string())
            .await?;

        tracing::debug!("Deleted task {} for user {}", id, owner);
        Ok(removed)
    }
}
