use crate::app::error::ServiceError;
use crate::domain::sync::{SyncConfig, SyncConfigInput, SyncPermissionReport};
use crate::domain::session::Session;
use crate::domain::validation::ValidationError;
use crate::infra::api::{ApiClient, ApiError};

const MIN_SYNC_INTERVAL_MINUTES: u32 = 5;

#[derive(Clone)]
pub struct SyncService {
    api: ApiClient,
}

impl SyncService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<SyncConfig>, ApiError> {
        self.api.get(session, "sync-configs").await
    }

    pub async fn create(
        &self,
        session: &Session,
        input: &SyncConfigInput,
    ) -> Result<SyncConfig, ServiceError> {
        validate(input)?;
        Ok(self.api.post(session, "sync-configs", input).await?)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: i64,
        input: &SyncConfigInput,
    ) -> Result<SyncConfig, ServiceError> {
        validate(input)?;
        Ok(self
            .api
            .put(session, &format!("sync-configs/{}", id), input)
            .await?)
    }

    pub async fn delete(&self, session: &Session, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(session, &format!("sync-configs/{}", id))
            .await
    }

    /// Asks the API to re-check the page permissions behind a sync config.
    pub async fn check_permission(
        &self,
        session: &Session,
        id: i64,
    ) -> Result<SyncPermissionReport, ApiError> {
        self.api
            .post_empty(session, &format!("sync-configs/{}/check-permission", id))
            .await
    }
}

fn validate(input: &SyncConfigInput) -> Result<(), ValidationError> {
    if let Some(interval) = input.interval_minutes {
        if interval < MIN_SYNC_INTERVAL_MINUTES {
            return Err(ValidationError::Invalid(format!(
                "sync interval must be at least {} minutes",
                MIN_SYNC_INTERVAL_MINUTES
            )));
        }
    }
    Ok(())
}
