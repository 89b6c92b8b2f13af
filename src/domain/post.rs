use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const DEFAULT_CHANNEL_COLOR: &str = "#1877f2";

/// Post record as returned by the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    pub status: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl RawPost {
    /// Timestamp used for calendar placement: scheduled, else published.
    pub fn calendar_time(&self) -> Option<OffsetDateTime> {
        self.scheduled_time.or(self.published_time)
    }

    pub fn channel_id(&self) -> Option<i64> {
        self.channel.as_ref().map(|channel| channel.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostStatus {
    Pending,
    Draft,
    Scheduled,
    Failed,
    Published,
    Publishing,
    Unknown(i32),
}

impl PostStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::Draft,
            2 => Self::Scheduled,
            3 => Self::Failed,
            4 => Self::Published,
            5 => Self::Publishing,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Pending => 0,
            Self::Draft => 1,
            Self::Scheduled => 2,
            Self::Failed => 3,
            Self::Published => 4,
            Self::Publishing => 5,
            Self::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Failed => "Failed",
            Self::Published => "Published",
            Self::Publishing => "Publishing",
            Self::Unknown(_) => "Unknown",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Draft => "status-draft",
            Self::Scheduled => "status-scheduled",
            Self::Failed => "status-failed",
            Self::Published => "status-published",
            Self::Publishing => "status-publishing",
            Self::Unknown(_) => "status-unknown",
        }
    }

    /// Drafts, scheduled and failed posts open in the editor.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Scheduled | Self::Failed)
    }
}

/// Client-side projection of a post, rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub channel_icon: Option<String>,
    pub channel_color: String,
    pub status: i32,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub date: String,
    pub time: String,
    pub raw: RawPost,
}

impl PostData {
    pub fn from_raw(raw: RawPost, offset: UtcOffset) -> Self {
        let status = PostStatus::from_code(raw.status);
        let display_time = raw
            .scheduled_time
            .or(raw.published_time)
            .or(raw.created_at)
            .map(|at| at.to_offset(offset));

        let (date, time) = match display_time {
            Some(at) => (format_date(at), format_time(at)),
            None => (String::new(), String::new()),
        };

        let thumbnail_url = raw
            .thumbnail_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| raw.media_urls.first().cloned());

        let (channel_icon, channel_color) = match &raw.channel {
            Some(channel) => (
                channel.icon.clone(),
                channel
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHANNEL_COLOR.to_string()),
            ),
            None => (None, DEFAULT_CHANNEL_COLOR.to_string()),
        };

        PostData {
            id: raw.id,
            title: raw.title.clone().unwrap_or_default(),
            description: raw.content.clone().unwrap_or_default(),
            thumbnail_url,
            channel_icon,
            channel_color,
            status: status.code(),
            status_label: status.label(),
            status_class: status.css_class(),
            date,
            time,
            raw,
        }
    }

    pub fn post_status(&self) -> PostStatus {
        PostStatus::from_code(self.status)
    }
}

fn format_date(at: OffsetDateTime) -> String {
    at.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_default()
}

fn format_time(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

/// What a click on a post card leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OpenTarget {
    Edit { route: String },
    Preview {
        #[serde(rename = "postId")]
        post_id: i64,
    },
}

impl OpenTarget {
    pub fn for_post(post: &PostData) -> Self {
        if post.post_status().is_editable() {
            OpenTarget::Edit {
                route: format!("/posts/{}/edit", post.id),
            }
        } else {
            OpenTarget::Preview { post_id: post.id }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
    Calendar,
}

/// Query parameters understood by the post listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One page of posts from the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    #[serde(default)]
    pub items: Vec<RawPost>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

/// Body for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub channel_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub status: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_time: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReply {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedReply {
    pub id: String,
}
