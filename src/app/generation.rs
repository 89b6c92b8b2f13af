use tracing::info;

use crate::app::error::ServiceError;
use crate::domain::generation::{GeneratedContent, GenerationRequest};
use crate::domain::session::Session;
use crate::domain::validation::require_text;
use crate::infra::api::ApiClient;

const MAX_PROMPT_LEN: usize = 4000;

#[derive(Clone)]
pub struct GenerationService {
    api: ApiClient,
}

impl GenerationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn generate(
        &self,
        session: &Session,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, ServiceError> {
        require_text("prompt", &request.prompt, MAX_PROMPT_LEN)?;
        let generated: GeneratedContent = self.api.post(session, "ai/generate", request).await?;
        info!(hashtags = generated.hashtags.len(), "content generated");
        Ok(generated)
    }
}
