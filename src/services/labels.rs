use std::sync::Arc;
use uuid::Uuid;
use crate::errors::{AppResult, StoreError, StoreResult};
use crate::models::{CreateLabel, Label, LabelPatch};
use super::store::{load_json, save_json, DocumentStore, Keys};

const DUPLICATE_NAME: &str = "A label with this name already exists";

#[derive(Clone)]
pub struct LabelStore {
    store: Arc<dyn DocumentStore>,
    keys: Keys,
}

impl LabelStore {
    pub fn new(store: Arc<dyn DocumentStore>, keys: Keys) -> Self {
        Self { store, keys }
    }

    // Takes the (owner, name) uniqueness key for `label`. Re-claiming a name the
    // label already holds succeeds.
    async fn claim_name(&self, label: &Label, name: &str) -> StoreResult<()> {
        let key = self.keys.label_name(&label.user_id, name);
        let id = label.id.to_string();
        if self.store.put_if_absent(&key, &id).await? {
            return Ok(());
        }
        match self.store.get(&key).await? {
            Some(holder) if holder == id => Ok(()),
            _ => Err(StoreError::Duplicate(DUPLICATE_NAME.into())),
        }
    }

    // Frees a name claimed for a write that then failed. Only logged if it fails too.
    async fn release_name(&self, owner: &Uuid, name: &str) {
        if let Err(e) = self.store.delete(&self.keys.label_name(owner, name)).await {
            tracing::error!("Failed to release label name claim for user {}: {}", owner, e);
        }
    }

    async fn insert(&self, label: &Label) -> StoreResult<()> {
        save_json(self.store.as_ref(), &self.keys.label(&label.id), label).await?;
        self.store
            .set_add(&self.keys.user_labels(&label.user_id), &label.id.to_string())
            .await
    }

    pub async fn create(&self, payload: CreateLabel, owner: &Uuid) -> AppResult<Label> {
        let label = Label::new(*owner, payload.name, payload.color);
        self.claim_name(&label, &label.name).await?;

        if let Err(e) = self.insert(&label).await {
            let _ = self.store.delete(&self.keys.label(&label.id)).await;
            self.release_name(owner, &label.name).await;
            return Err(e.into());
        }

        tracing::debug!("Created label {} for user {}", label.id, owner);
        Ok(label)
    }

    /// All labels of `owner`, sorted by name.
    pub async fn list(&self, owner: &Uuid) -> AppResult<Vec<Label>> {
        let ids = self.store.set_members(&self.keys.user_labels(owner)).await?;
        let mut labels = Vec::with_capacity(ids.len());
        for id in ids {
            let Ok(id) = Uuid::parse_str(&id) else {
                tracing::warn!("Skipping malformed label id {} for user {}", id, owner);
                continue;
            };
            if let Some(label) = self.get(&id, owner).await? {
                labels.push(label);
            }
        }
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels)
    }

    /// None when the label is missing or belongs to someone else.
    pub async fn get(&self, id: &Uuid, owner: &Uuid) -> AppResult<Option<Label>> {
        let label: Option<Label> = load_json(self.store.as_ref(), &self.keys.label(id)).await?;
        Ok(label.filter(|label| &label.user_id == owner))
    }

    pub async fn update(&self, id: &Uuid, owner: &Uuid, patch: LabelPatch) -> AppResult<Option<Label>> {
        let Some(mut label) = self.get(id, owner).await? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(label));
        }

        let old_name = label.name.clone();
        let renamed = patch.name.as_ref().is_some_and(|name| name != &old_name);
        if let Some(name) = patch.name.as_deref().filter(|_| renamed) {
            self.claim_name(&label, name).await?;
        }

        label.apply(patch);
        if let Err(e) = save_json(self.store.as_ref(), &self.keys.label(id), &label).await {
            if renamed {
                self.release_name(owner, &label.name).await;
            }
            return Err(e.into());
        }

        if label.name != old_name {
            self.store.delete(&self.keys.label_name(owner, &old_name)).await?;
        }

        tracing::debug!("Updated label {} for user {}", id, owner);
        Ok(Some(label))
    }

    pub async fn delete(&self, id: &Uuid, owner: &Uuid) -> AppResult<bool> {
        let Some(label) = self.get(id, owner).await? else {
            return Ok(false);
        };

        let removed = self.store.delete(&self.keys.label(id)).await?;
        self.store
            .set_remove(&self.keys.user_labels(owner), &id.to_string())
            .await?;
        self.store
            .delete(&self.keys.label_name(owner, &label.name))
            .await?;

        tracing::debug!("Deleted label {} for user {}", id, owner);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use crate::errors::AppError;
    use crate::services::MemoryStore;

    fn labels() -> LabelStore {
        LabelStore::new(Arc::new(MemoryStore::new()), Keys::new("test"))
    }

    // Memory store whose label document writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_label_writes: AtomicBool,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
            if self.fail_label_writes.load(Ordering::SeqCst) && key.contains(":label:") {
                let err = redis::RedisError::from((redis::ErrorKind::IoError, "connection lost"));
                return Err(err.into());
            }
            self.inner.put(key, value).await
        }

        async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
            self.inner.put_if_absent(key, value).await
        }

        async fn delete(&self, key: &str) -> StoreResult<bool> {
            self.inner.delete(key).await
        }

        async fn set_add(&self, set: &str, member: &str) -> StoreResult<()> {
            self.inner.set_add(set, member).await
        }

        async fn set_remove(&self, set: &str, member: &str) -> StoreResult<()> {
            self.inner.set_remove(set, member).await
        }

        async fn set_members(&self, set: &str) -> StoreResult<Vec<String>> {
            self.inner.set_members(set).await
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    fn payload(name: &str) -> CreateLabel {
        CreateLabel { name: name.into(), color: Some("#FF5733".into()) }
    }

    #[tokio::test]
    async fn name_is_unique_per_owner() {
        let labels = labels();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        labels.create(payload("Work"), &alice).await.unwrap();
        let err = labels.create(payload("Work"), &alice).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));

        assert!(labels.create(payload("Work"), &bob).await.is_ok());
        assert_eq!(labels.list(&alice).await.unwrap().len(), 1);
        assert_eq!(labels.list(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn foreign_label_looks_missing() {
        let labels = labels();
        let alice = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let label = labels.create(payload("Work"), &alice).await.unwrap();

        assert!(labels.get(&label.id, &mallory).await.unwrap().is_none());
        let patch = LabelPatch { name: Some("Mine".into()), ..Default::default() };
        assert!(labels.update(&label.id, &mallory, patch).await.unwrap().is_none());
        assert!(!labels.delete(&label.id, &mallory).await.unwrap());

        let unchanged = labels.get(&label.id, &alice).await.unwrap().unwrap();
        assert_eq!(unchanged, label);
    }

    #[tokio::test]
    async fn rename_moves_the_uniqueness_claim() {
        let labels = labels();
        let owner = Uuid::new_v4();
        let work = labels.create(payload("Work"), &owner).await.unwrap();
        labels.create(payload("Home"), &owner).await.unwrap();

        let clash = LabelPatch { name: Some("Home".into()), ..Default::default() };
        assert!(matches!(
            labels.update(&work.id, &owner, clash).await,
            Err(AppError::DuplicateKey(_))
        ));

        let rename = LabelPatch { name: Some("Office".into()), ..Default::default() };
        let renamed = labels.update(&work.id, &owner, rename).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Office");
        assert!(renamed.updated_at >= work.updated_at);

        // the old name is free again
        assert!(labels.create(payload("Work"), &owner).await.is_ok());
    }

    #[tokio::test]
    async fn same_name_update_is_not_a_clash() {
        let labels = labels();
        let owner = Uuid::new_v4();
        let work = labels.create(payload("Work"), &owner).await.unwrap();

        let patch = LabelPatch { name: Some("Work".into()), color: Some(None) };
        let updated = labels.update(&work.id, &owner, patch).await.unwrap().unwrap();
        assert_eq!(updated.color, None);
    }

    #[tokio::test]
    async fn empty_patch_returns_label_unmodified() {
        let labels = labels();
        let owner = Uuid::new_v4();
        let work = labels.create(payload("Work"), &owner).await.unwrap();

        let same = labels.update(&work.id, &owner, LabelPatch::default()).await.unwrap().unwrap();
        assert_eq!(same, work);
    }

    #[tokio::test]
    async fn delete_releases_name() {
        let labels = labels();
        let owner = Uuid::new_v4();
        let work = labels.create(payload("Work"), &owner).await.unwrap();

        assert!(labels.delete(&work.id, &owner).await.unwrap());
        assert!(!labels.delete(&work.id, &owner).await.unwrap());
        assert!(labels.list(&owner).await.unwrap().is_empty());
        assert!(labels.create(payload("Work"), &owner).await.is_ok());
    }

    #[tokio::test]
    async fn failed_create_releases_name() {
        let store = Arc::new(FlakyStore::default());
        let labels = LabelStore::new(store.clone(), Keys::new("test"));
        let owner = Uuid::new_v4();

        store.fail_label_writes.store(true, Ordering::SeqCst);
        assert!(matches!(
            labels.create(payload("Work"), &owner).await,
            Err(AppError::Store(_))
        ));
        assert!(labels.list(&owner).await.unwrap().is_empty());

        store.fail_label_writes.store(false, Ordering::SeqCst);
        let work = labels.create(payload("Work"), &owner).await.unwrap();
        assert_eq!(labels.list(&owner).await.unwrap(), vec![work]);
    }

    #[tokio::test]
    async fn failed_rename_releases_new_name() {
        let store = Arc::new(FlakyStore::default());
        let labels = LabelStore::new(store.clone(), Keys::new("test"));
        let owner = Uuid::new_v4();
        let work = labels.create(payload("Work"), &owner).await.unwrap();

        store.fail_label_writes.store(true, Ordering::SeqCst);
        let rename = LabelPatch { name: Some("Office".into()), ..Default::default() };
        assert!(labels.update(&work.id, &owner, rename).await.is_err());
        store.fail_label_writes.store(false, Ordering::SeqCst);

        // the old name is still held, the new one is free
        assert_eq!(labels.get(&work.id, &owner).await.unwrap().unwrap().name, "Work");
        assert!(matches!(
            labels.create(payload("Work"), &owner).await,
            Err(AppError::DuplicateKey(_))
        ));
        assert!(labels.create(payload("Office"), &owner).await.is_ok());
    }
}
