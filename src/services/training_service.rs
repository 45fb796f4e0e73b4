use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::auth::SessionStore;
use crate::models::validation::{self, ValidationError};
use crate::models::{Training, TrainingDraft, TrainingUpdate};
use crate::remote::{DocumentStore, StoreError};

/// Store collection holding training documents.
pub const TRAININGS_COLLECTION: &str = "trainings";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no active user session")]
    Unauthenticated,
    #[error("training not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// Create/read/update/delete for trainings, scoped to the current user.
///
/// Every write checks the session before touching the store, so an
/// unauthenticated caller fails without a network round trip. A failed
/// write changes nothing locally; the caller can retry with the same input.
pub struct TrainingService {
    store: Arc<dyn DocumentStore>,
    session: Arc<SessionStore>,
}

impl TrainingService {
    pub fn new(store: Arc<dyn DocumentStore>, session: Arc<SessionStore>) -> Self {
        Self { store, session }
    }

    fn require_user_id(&self) -> Result<String, ServiceError> {
        self.session
            .current_user_id()
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Persist a draft as a new training owned by the current user and
    /// return its store-assigned id.
    pub async fn create(&self, draft: &TrainingDraft) -> Result<String, ServiceError> {
        validation::validate_draft(draft)?;
        let owner = self.require_user_id()?;

        let data = draft.document_data(&owner).map_err(StoreError::from)?;
        let id = self.store.insert(TRAININGS_COLLECTION, data).await?;
        tracing::debug!(%id, "created training");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Training, ServiceError> {
        let document = self
            .store
            .get(TRAININGS_COLLECTION, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        let training =
            Training::parse(document.id, document.data).map_err(StoreError::from)?;
        Ok(training)
    }

    /// Write the fields present in `update`; absent fields are untouched.
    /// An empty update is a no-op.
    pub async fn update(&self, id: &str, update: &TrainingUpdate) -> Result<(), ServiceError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyTrainingName.into());
            }
        }
        if let Some(exercises) = &update.exercises {
            validation::validate_exercises(exercises)?;
        }
        self.require_user_id()?;

        if update.is_empty() {
            return Ok(());
        }

        let changes: Value = update.document_changes().map_err(StoreError::from)?;
        self.store.update(TRAININGS_COLLECTION, id, changes).await?;
        tracing::debug!(%id, "updated training");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.require_user_id()?;
        self.store.delete(TRAININGS_COLLECTION, id).await?;
        tracing::debug!(%id, "deleted training");
        Ok(())
    }

    /// Flip the completion status of a training.
    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<(), ServiceError> {
        self.update(
            id,
            &TrainingUpdate {
                completed: Some(completed),
                ..Default::default()
            },
        )
        .await
    }
}
