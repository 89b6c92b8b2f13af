use std::marker::PhantomData;

use serde::Serialize;
use tracing::info;

use crate::app::error::ServiceError;
use crate::domain::resources::{Channel, ChannelConnect, Resource, ResourceList};
use crate::domain::session::Session;
use crate::infra::api::{ApiClient, ApiError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// CRUD calls for one of the plain resource screens.
pub struct ResourceService<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub async fn list(
        &self,
        session: &Session,
        params: &ListParams,
    ) -> Result<ResourceList<R>, ApiError> {
        self.api.get_with_query(session, R::PATH, params).await
    }

    pub async fn get(&self, session: &Session, id: i64) -> Result<R, ApiError> {
        self.api.get(session, &format!("{}/{}", R::PATH, id)).await
    }

    pub async fn create(&self, session: &Session, input: &R::Input) -> Result<R, ServiceError> {
        R::validate(input)?;
        let created = self.api.post(session, R::PATH, input).await?;
        info!(resource = R::NAME, "resource created");
        Ok(created)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: i64,
        input: &R::Input,
    ) -> Result<R, ServiceError> {
        R::validate(input)?;
        let updated = self
            .api
            .put(session, &format!("{}/{}", R::PATH, id), input)
            .await?;
        info!(resource = R::NAME, id, "resource updated");
        Ok(updated)
    }

    pub async fn delete(&self, session: &Session, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(session, &format!("{}/{}", R::PATH, id))
            .await?;
        info!(resource = R::NAME, id, "resource deleted");
        Ok(())
    }
}

impl ResourceService<Channel> {
    /// Registers a page obtained through the platform login flow.
    pub async fn connect(
        &self,
        session: &Session,
        request: &ChannelConnect,
    ) -> Result<Channel, ServiceError> {
        request.validate()?;
        let channel: Channel = self.api.post(session, "channels/connect", request).await?;
        info!(channel_id = channel.id, "channel connected");
        Ok(channel)
    }
}
