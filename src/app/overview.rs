use serde::Serialize;
use time::UtcOffset;

use crate::app::posts::PostService;
use crate::domain::post::{PostData, PostListQuery};
use crate::domain::session::Session;
use crate::domain::stats::DashboardStats;
use crate::infra::api::{ApiClient, ApiError};

const RECENT_POSTS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub stats: DashboardStats,
    pub recent_posts: Vec<PostData>,
}

#[derive(Clone)]
pub struct OverviewService {
    api: ApiClient,
    posts: PostService,
}

impl OverviewService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            posts: PostService::new(api.clone()),
            api,
        }
    }

    pub async fn load(&self, session: &Session, offset: UtcOffset) -> Result<Overview, ApiError> {
        let recent_query = PostListQuery {
            page: 1,
            limit: RECENT_POSTS,
            ..PostListQuery::default()
        };

        let (stats, recent) = futures::try_join!(
            self.api.get::<DashboardStats>(session, "statistics/dashboard"),
            self.posts.list(session, &recent_query),
        )?;

        Ok(Overview {
            stats,
            recent_posts: recent
                .items
                .into_iter()
                .map(|raw| PostData::from_raw(raw, offset))
                .collect(),
        })
    }
}
