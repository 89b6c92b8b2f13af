use std::sync::Arc;

use async_trait::async_trait;

use crate::app::error::ServiceError;
use crate::domain::post::{
    CommentReply, PostInput, PostListQuery, PostPage, PostStatus, PostedReply, RawPost,
};
use crate::domain::session::Session;
use crate::domain::validation::{require_platform_id, require_text};
use crate::infra::api::{ApiClient, ApiError};

const MAX_REPLY_LEN: usize = 8000;

/// Anything that can serve one page of the post listing.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_page(&self, query: &PostListQuery) -> Result<PostPage, ApiError>;
}

#[async_trait]
impl<T: PostSource + ?Sized> PostSource for Arc<T> {
    async fn fetch_page(&self, query: &PostListQuery) -> Result<PostPage, ApiError> {
        (**self).fetch_page(query).await
    }
}

#[derive(Clone)]
pub struct PostService {
    api: ApiClient,
}

impl PostService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        session: &Session,
        query: &PostListQuery,
    ) -> Result<PostPage, ApiError> {
        self.api.get_with_query(session, "posts", query).await
    }

    pub async fn get_post(&self, session: &Session, post_id: i64) -> Result<RawPost, ApiError> {
        self.api.get(session, &format!("posts/{}", post_id)).await
    }

    pub async fn create_post(
        &self,
        session: &Session,
        input: &PostInput,
    ) -> Result<RawPost, ApiError> {
        self.api.post(session, "posts", input).await
    }

    pub async fn update_post(
        &self,
        session: &Session,
        post_id: i64,
        input: &PostInput,
    ) -> Result<RawPost, ApiError> {
        self.api
            .put(session, &format!("posts/{}", post_id), input)
            .await
    }

    pub async fn delete_post(&self, session: &Session, post_id: i64) -> Result<(), ApiError> {
        self.api.delete(session, &format!("posts/{}", post_id)).await
    }

    pub async fn publish_now(&self, session: &Session, post_id: i64) -> Result<RawPost, ApiError> {
        self.api
            .post_empty(session, &format!("posts/{}/publish", post_id))
            .await
    }

    pub async fn reply_to_comment(
        &self,
        session: &Session,
        post_id: i64,
        comment_id: &str,
        message: &str,
    ) -> Result<PostedReply, ServiceError> {
        require_platform_id("comment id", comment_id)?;
        require_text("message", message, MAX_REPLY_LEN)?;

        let body = CommentReply {
            message: message.trim().to_string(),
        };
        let reply = self
            .api
            .post(
                session,
                &format!("posts/{}/comments/{}/reply", post_id, comment_id),
                &body,
            )
            .await?;
        Ok(reply)
    }

    /// Copies an existing post into a new draft on the same channel.
    pub async fn repost(
        &self,
        session: &Session,
        original: &RawPost,
    ) -> Result<RawPost, ServiceError> {
        let channel_id = original
            .channel_id()
            .ok_or_else(|| ServiceError::Denied("post has no channel to repost to".to_string()))?;

        let input = PostInput {
            channel_id,
            title: original.title.clone(),
            content: original.content.clone().unwrap_or_default(),
            media_urls: original.media_urls.clone(),
            status: PostStatus::Draft.code(),
            scheduled_time: None,
        };
        Ok(self.create_post(session, &input).await?)
    }

    /// Binds the service to one session so it can feed a listing.
    pub fn for_session(&self, session: Session) -> SessionPosts {
        SessionPosts {
            service: self.clone(),
            session,
        }
    }
}

#[derive(Clone)]
pub struct SessionPosts {
    service: PostService,
    session: Session,
}

#[async_trait]
impl PostSource for SessionPosts {
    async fn fetch_page(&self, query: &PostListQuery) -> Result<PostPage, ApiError> {
        self.service.list(&self.session, query).await
    }
}
