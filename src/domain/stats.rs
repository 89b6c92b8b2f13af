use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub scheduled_posts: u64,
    #[serde(default)]
    pub published_posts: u64,
    #[serde(default)]
    pub draft_posts: u64,
    #[serde(default)]
    pub failed_posts: u64,
    #[serde(default)]
    pub total_channels: u64,
    #[serde(default)]
    pub weekly_engagement: Vec<EngagementPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementPoint {
    pub date: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
}
