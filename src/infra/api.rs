use anyhow::{anyhow, Result};
use bytes::Bytes;
use reqwest::header::{HeaderName, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::AppConfig;
use crate::domain::session::Session;

pub const ORG_HEADER: HeaderName = HeaderName::from_static("x-organization-id");

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to content API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("content API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid content API response: {0}")]
    Decode(String),

    #[error("invalid content API path: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Thin typed client for the remote content API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|err| anyhow!("failed to build HTTP client: {}", err))?;

        Ok(Self {
            http,
            base_url: config.upstream_api_url.clone(),
        })
    }

    /// Appends `path` to the base URL one segment at a time, so reserved
    /// characters are percent-encoded and dot segments are dropped.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{}: base URL cannot hold a path", path)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        session: &Session,
        path: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        debug!(%method, %url, org_id = session.org_id, "content API request");
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", session.access_token))
            .header(ORG_HEADER, session.org_id.to_string()))
    }

    pub async fn get<T>(&self, session: &Session, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, session, path)?.send().await?;
        decode(response).await
    }

    pub async fn get_with_query<Q, T>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, session, path)?
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, session: &Session, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, session, path)?
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    /// POST without a body, for trigger-style endpoints.
    pub async fn post_empty<T>(&self, session: &Session, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, session, path)?.send().await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, session: &Session, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::PUT, session, path)?
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, session: &Session, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, session, path)?.send().await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn upload<T>(
        &self,
        session: &Session,
        path: &str,
        filename: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut part = Part::stream(data).file_name(filename.to_string());
        if let Some(content_type) = content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .request(Method::POST, session, path)?
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    Err(ApiError::Status { status, message })
}

async fn decode<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}
