use bytes::Bytes;
use tracing::info;

use crate::app::error::ServiceError;
use crate::domain::media::UploadedFile;
use crate::domain::session::Session;
use crate::domain::validation::{require_text, ValidationError};
use crate::infra::api::ApiClient;

const MAX_FILENAME_LEN: usize = 255;

#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(api: ApiClient, max_bytes: usize) -> Self {
        Self { api, max_bytes }
    }

    /// Forwards a file to the upload endpoint and returns its stored URL.
    pub async fn upload(
        &self,
        session: &Session,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<UploadedFile, ServiceError> {
        require_text("filename", filename, MAX_FILENAME_LEN)?;
        check_content_type(content_type)?;
        if data.is_empty() {
            return Err(ValidationError::Required("file").into());
        }
        if data.len() > self.max_bytes {
            return Err(ValidationError::Invalid(format!(
                "file must be at most {} bytes",
                self.max_bytes
            ))
            .into());
        }

        let size = data.len();
        let uploaded: UploadedFile = self
            .api
            .upload(session, "uploads", filename, Some(content_type), data)
            .await?;
        info!(bytes = size, url = %uploaded.url, "file uploaded");
        Ok(uploaded)
    }
}

fn check_content_type(content_type: &str) -> Result<(), ValidationError> {
    match content_type {
        "image/jpeg" | "image/png" | "image/webp" | "image/gif" | "video/mp4" => Ok(()),
        other => Err(ValidationError::Invalid(format!(
            "unsupported content type: {}",
            other
        ))),
    }
}
