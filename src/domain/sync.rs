use serde::{Deserialize, Serialize};

/// Per-organization setting for ingesting existing posts from a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub id: i64,
    pub channel_id: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    #[serde(default)]
    pub last_synced_at: Option<String>,
    #[serde(default)]
    pub permission_ok: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfigInput {
    pub channel_id: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPermissionReport {
    pub ok: bool,
    #[serde(default)]
    pub missing_permissions: Vec<String>,
}
