use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::app::error::ServiceError;
use crate::config::roles::PostAction;
use crate::domain::permission::UserPermission;
use crate::domain::session::Session;
use crate::infra::api::{ApiClient, ApiError};

struct CachedPermission {
    permission: UserPermission,
    fetched_at: Instant,
}

/// One shared permission lookup, cached per (org id, user id).
#[derive(Clone)]
pub struct PermissionService {
    api: ApiClient,
    ttl: Duration,
    cache: Arc<RwLock<HashMap<(i64, i64), CachedPermission>>>,
}

impl PermissionService {
    pub fn new(api: ApiClient, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn current(&self, session: &Session) -> Result<UserPermission, ApiError> {
        let key = (session.org_id, session.user_id);

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!(org_id = key.0, user_id = key.1, "permission cache hit");
                    return Ok(entry.permission.clone());
                }
            }
        }

        let permission: UserPermission = self.api.get(session, "permissions/check").await?;

        let mut cache = self.cache.write().await;
        let ttl = self.ttl;
        cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        cache.insert(
            key,
            CachedPermission {
                permission: permission.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(permission)
    }

    /// Number of cached entries, expired or not.
    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn invalidate(&self, org_id: i64, user_id: i64) {
        self.cache.write().await.remove(&(org_id, user_id));
    }

    pub async fn invalidate_org(&self, org_id: i64) {
        self.cache
            .write()
            .await
            .retain(|(cached_org, _), _| *cached_org != org_id);
    }
}

/// Refuses an action the caller's affordances do not offer.
pub fn ensure_allowed(
    permission: &UserPermission,
    action: PostAction,
    channel_id: Option<i64>,
) -> Result<(), ServiceError> {
    if permission.allows(action, channel_id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(action))
    }
}

/// Settings screens (sync configs, page connection) need full post rights.
pub fn ensure_full_access(permission: &UserPermission) -> Result<(), ServiceError> {
    if permission.affordances().publish {
        Ok(())
    } else {
        Err(ServiceError::Denied(
            "settings require full access to the organization".to_string(),
        ))
    }
}
