use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::app::permissions::PermissionService;
use crate::config::roles::Affordances;
use crate::domain::organization::Organization;
use crate::domain::permission::UserPermission;
use crate::domain::session::Session;
use crate::infra::api::{ApiClient, ApiError};

/// Everything the screens need to know about the active organization.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgState {
    pub session: Session,
    pub organization: Organization,
    pub permission: UserPermission,
}

impl OrgState {
    pub fn affordances(&self) -> Affordances {
        self.permission.affordances()
    }
}

/// Explicit org-scoped context: initialised on org switch, torn down on logout.
#[derive(Clone)]
pub struct OrgContext {
    api: ApiClient,
    permissions: PermissionService,
    current: Arc<RwLock<Option<OrgState>>>,
}

impl OrgContext {
    pub fn new(api: ApiClient, permissions: PermissionService) -> Self {
        Self {
            api,
            permissions,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn switch_to(&self, session: Session) -> Result<OrgState, ApiError> {
        let previous = self.current.read().await.clone();
        if let Some(previous) = previous {
            if previous.session != session {
                self.teardown(&previous).await;
            }
        }

        let org_path = format!("organizations/{}", session.org_id);
        let (organization, permission) = futures::try_join!(
            self.api.get::<Organization>(&session, &org_path),
            self.permissions.current(&session),
        )?;

        let state = OrgState {
            session,
            organization,
            permission,
        };
        info!(
            org_id = state.session.org_id,
            user_id = state.session.user_id,
            "organization context ready"
        );
        *self.current.write().await = Some(state.clone());
        Ok(state)
    }

    pub async fn current(&self) -> Option<OrgState> {
        self.current.read().await.clone()
    }

    /// Logout: drops the context and its cached permission.
    pub async fn clear(&self) {
        let previous = self.current.write().await.take();
        if let Some(previous) = previous {
            self.teardown(&previous).await;
        }
    }

    async fn teardown(&self, state: &OrgState) {
        self.permissions
            .invalidate(state.session.org_id, state.session.user_id)
            .await;
        info!(org_id = state.session.org_id, "organization context cleared");
    }
}

/// Active organization context of every signed-in user, keyed by user id.
#[derive(Clone)]
pub struct OrgContexts {
    api: ApiClient,
    permissions: PermissionService,
    by_user: Arc<RwLock<HashMap<i64, OrgContext>>>,
}

impl OrgContexts {
    pub fn new(api: ApiClient, permissions: PermissionService) -> Self {
        Self {
            api,
            permissions,
            by_user: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn for_user(&self, user_id: i64) -> OrgContext {
        if let Some(context) = self.by_user.read().await.get(&user_id) {
            return context.clone();
        }
        self.by_user
            .write()
            .await
            .entry(user_id)
            .or_insert_with(|| OrgContext::new(self.api.clone(), self.permissions.clone()))
            .clone()
    }

    /// Makes `session`'s organization the user's active one.
    pub async fn switch_to(&self, session: Session) -> Result<OrgState, ApiError> {
        self.for_user(session.user_id).await.switch_to(session).await
    }

    /// Drops the user's context and whatever was cached for `session`.
    pub async fn logout(&self, session: &Session) {
        let context = self.by_user.write().await.remove(&session.user_id);
        if let Some(context) = context {
            context.clear().await;
        }
        self.permissions
            .invalidate(session.org_id, session.user_id)
            .await;
    }
}
