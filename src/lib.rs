pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::time::Duration;

use anyhow::Result;
use time::{OffsetDateTime, UtcOffset};

use crate::app::org::OrgContexts;
use crate::app::permissions::PermissionService;
use crate::app::posts::{PostService, SessionPosts};
use crate::app::schedule::{ListingState, ScheduleView};
use crate::config::AppConfig;
use crate::domain::session::Session;
use crate::infra::api::ApiClient;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub permissions: PermissionService,
    pub contexts: OrgContexts,
    pub page_size: u32,
    pub display_offset: UtcOffset,
    pub search_debounce: Duration,
    pub upload_max_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let permissions = PermissionService::new(api.clone(), config.permission_cache_ttl());
        let contexts = OrgContexts::new(api.clone(), permissions.clone());

        Ok(Self {
            api,
            permissions,
            contexts,
            page_size: config.page_size,
            display_offset: config.display_offset(),
            search_debounce: config.search_debounce(),
            upload_max_bytes: config.upload_max_bytes,
        })
    }

    /// Schedule screen for one session, opened on the current month.
    pub fn schedule_view(&self, session: Session) -> ScheduleView<SessionPosts> {
        let today = OffsetDateTime::now_utc().to_offset(self.display_offset).date();
        let listing = ListingState::new(self.page_size, self.display_offset, today);
        let source = PostService::new(self.api.clone()).for_session(session);
        ScheduleView::new(source, listing, self.search_debounce)
    }
}
