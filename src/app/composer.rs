use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::app::error::ServiceError;
use crate::app::permissions::ensure_allowed;
use crate::app::posts::PostService;
use crate::config::roles::PostAction;
use crate::domain::permission::UserPermission;
use crate::domain::post::{PostInput, PostStatus, RawPost};
use crate::domain::session::Session;
use crate::domain::validation::{check_length, require_text, ValidationError};

const MAX_TITLE_LEN: usize = 255;
const MAX_CONTENT_LEN: usize = 63_206;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComposeAction {
    SaveDraft,
    Schedule,
    PublishNow,
}

impl ComposeAction {
    pub fn required_action(&self) -> PostAction {
        match self {
            ComposeAction::SaveDraft => PostAction::SaveDraft,
            ComposeAction::Schedule => PostAction::Schedule,
            ComposeAction::PublishNow => PostAction::Publish,
        }
    }

    fn status(&self) -> PostStatus {
        match self {
            ComposeAction::Schedule => PostStatus::Scheduled,
            ComposeAction::SaveDraft | ComposeAction::PublishNow => PostStatus::Draft,
        }
    }
}

/// Form state of the create/edit screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default)]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_time: Option<OffsetDateTime>,
}

/// `#`-prefixed, deduplicated case-insensitively, first spelling kept.
pub fn normalize_hashtags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let bare = tag.trim().trim_start_matches('#');
        if bare.is_empty() || bare.chars().any(char::is_whitespace) {
            continue;
        }
        let candidate = format!("#{}", bare);
        if !normalized
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&candidate))
        {
            normalized.push(candidate);
        }
    }
    normalized
}

/// Validates a draft and turns it into the API body for `action`.
pub fn prepare(
    draft: &PostDraft,
    action: ComposeAction,
    permission: &UserPermission,
    now: OffsetDateTime,
) -> Result<PostInput, ServiceError> {
    let channel_id = draft
        .channel_id
        .ok_or(ValidationError::Required("channel"))?;
    require_text("content", &draft.content, MAX_CONTENT_LEN)?;
    check_length("title", &draft.title, MAX_TITLE_LEN)?;

    let scheduled_time = match action {
        ComposeAction::Schedule => {
            let at = draft
                .scheduled_time
                .ok_or(ValidationError::Required("scheduled time"))?;
            if at <= now {
                return Err(ValidationError::Invalid(
                    "scheduled time must be in the future".to_string(),
                )
                .into());
            }
            Some(at)
        }
        ComposeAction::SaveDraft => draft.scheduled_time,
        ComposeAction::PublishNow => None,
    };

    ensure_allowed(permission, action.required_action(), Some(channel_id))?;

    let hashtags = normalize_hashtags(&draft.hashtags);
    let mut content = draft.content.trim().to_string();
    if !hashtags.is_empty() {
        content.push_str("\n\n");
        content.push_str(&hashtags.join(" "));
    }
    check_length("content", &content, MAX_CONTENT_LEN)?;

    let title = draft.title.trim();

    Ok(PostInput {
        channel_id,
        title: (!title.is_empty()).then(|| title.to_string()),
        content,
        media_urls: draft.media_urls.clone(),
        status: action.status().code(),
        scheduled_time,
    })
}

/// Submit logic shared by the create and edit screens.
#[derive(Clone)]
pub struct Composer {
    posts: PostService,
}

impl Composer {
    pub fn new(posts: PostService) -> Self {
        Self { posts }
    }

    pub async fn create(
        &self,
        session: &Session,
        permission: &UserPermission,
        draft: &PostDraft,
        action: ComposeAction,
    ) -> Result<RawPost, ServiceError> {
        ensure_allowed(permission, PostAction::Create, draft.channel_id)?;
        let input = prepare(draft, action, permission, OffsetDateTime::now_utc())?;

        let created = self.posts.create_post(session, &input).await?;
        info!(post_id = created.id, ?action, "post created");

        self.finish(session, created, action).await
    }

    pub async fn update(
        &self,
        session: &Session,
        permission: &UserPermission,
        post_id: i64,
        draft: &PostDraft,
        action: ComposeAction,
    ) -> Result<RawPost, ServiceError> {
        let existing = self.posts.get_post(session, post_id).await?;
        let status = PostStatus::from_code(existing.status);
        if !status.is_editable() {
            return Err(ServiceError::NotEditable(existing.status));
        }
        ensure_allowed(permission, PostAction::Edit, existing.channel_id())?;

        let input = prepare(draft, action, permission, OffsetDateTime::now_utc())?;
        let updated = self.posts.update_post(session, post_id, &input).await?;
        info!(post_id, ?action, "post updated");

        self.finish(session, updated, action).await
    }

    async fn finish(
        &self,
        session: &Session,
        post: RawPost,
        action: ComposeAction,
    ) -> Result<RawPost, ServiceError> {
        if action != ComposeAction::PublishNow {
            return Ok(post);
        }
        let published = self.posts.publish_now(session, post.id).await?;
        info!(post_id = published.id, "post published");
        Ok(published)
    }
}
