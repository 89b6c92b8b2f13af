use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A scheduled batch of automated comments against one target post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingCampaign {
    pub id: i64,
    pub name: String,
    pub channel_id: i64,
    pub target_post_id: String,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    #[serde(default)]
    pub total_comments: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingCampaignInput {
    pub name: String,
    pub channel_id: i64,
    pub target_post_id: String,
    pub comments: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub interval_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub posted: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub pending: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingDetail {
    #[serde(flatten)]
    pub campaign: SeedingCampaign,
    #[serde(default)]
    pub comments: Vec<SeedingComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingComment {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub posted_at: Option<OffsetDateTime>,
}
