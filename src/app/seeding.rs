use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::app::error::ServiceError;
use crate::domain::resources::ResourceList;
use crate::domain::seeding::{SeedingCampaign, SeedingCampaignInput, SeedingDetail, SeedingStats};
use crate::domain::session::Session;
use crate::domain::validation::{check_length, require_text, ValidationError};
use crate::infra::api::{ApiClient, ApiError};

const MAX_NAME_LEN: usize = 255;
const MAX_COMMENT_LEN: usize = 8000;
const MAX_INTERVAL_MINUTES: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Target,
    Comments,
    Schedule,
    Review,
}

impl WizardStep {
    fn next(self) -> Self {
        match self {
            WizardStep::Target => WizardStep::Comments,
            WizardStep::Comments => WizardStep::Schedule,
            WizardStep::Schedule | WizardStep::Review => WizardStep::Review,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::Target | WizardStep::Comments => WizardStep::Target,
            WizardStep::Schedule => WizardStep::Comments,
            WizardStep::Review => WizardStep::Schedule,
        }
    }
}

/// Multi-step form for creating a seeding campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedingWizard {
    step: WizardStep,
    pub name: String,
    pub channel_id: Option<i64>,
    pub target_post_id: String,
    pub comments: Vec<String>,
    pub start_time: Option<OffsetDateTime>,
    pub interval_minutes: u32,
}

impl Default for SeedingWizard {
    fn default() -> Self {
        Self {
            step: WizardStep::Target,
            name: String::new(),
            channel_id: None,
            target_post_id: String::new(),
            comments: Vec::new(),
            start_time: None,
            interval_minutes: 5,
        }
    }
}

impl SeedingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Advances only when the current step is valid.
    pub fn next(&mut self, now: OffsetDateTime) -> Result<WizardStep, ValidationError> {
        self.validate_step(self.step, now)?;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    pub fn validate_step(&self, step: WizardStep, now: OffsetDateTime) -> Result<(), ValidationError> {
        match step {
            WizardStep::Target => {
                require_text("name", &self.name, MAX_NAME_LEN)?;
                if self.channel_id.is_none() {
                    return Err(ValidationError::Required("channel"));
                }
                require_text("target post", &self.target_post_id, MAX_NAME_LEN)
            }
            WizardStep::Comments => {
                let comments = cleaned_comments(&self.comments);
                if comments.is_empty() {
                    return Err(ValidationError::Required("comments"));
                }
                for comment in &comments {
                    check_length("comment", comment, MAX_COMMENT_LEN)?;
                }
                Ok(())
            }
            WizardStep::Schedule => {
                let start = self
                    .start_time
                    .ok_or(ValidationError::Required("start time"))?;
                if start <= now {
                    return Err(ValidationError::Invalid(
                        "start time must be in the future".to_string(),
                    ));
                }
                check_interval(self.interval_minutes)
            }
            WizardStep::Review => {
                self.validate_step(WizardStep::Target, now)?;
                self.validate_step(WizardStep::Comments, now)?;
                self.validate_step(WizardStep::Schedule, now)
            }
        }
    }

    /// Final request body; only available from the review step.
    pub fn build(&self, now: OffsetDateTime) -> Result<SeedingCampaignInput, ValidationError> {
        if self.step != WizardStep::Review {
            return Err(ValidationError::Invalid(
                "campaign can only be submitted from the review step".to_string(),
            ));
        }
        self.validate_step(WizardStep::Review, now)?;

        let (Some(channel_id), Some(start_time)) = (self.channel_id, self.start_time) else {
            return Err(ValidationError::Invalid("incomplete campaign".to_string()));
        };

        Ok(SeedingCampaignInput {
            name: self.name.trim().to_string(),
            channel_id,
            target_post_id: self.target_post_id.trim().to_string(),
            comments: cleaned_comments(&self.comments),
            start_time,
            interval_minutes: self.interval_minutes,
        })
    }
}

fn cleaned_comments(comments: &[String]) -> Vec<String> {
    comments
        .iter()
        .map(|comment| comment.trim())
        .filter(|comment| !comment.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_interval(interval_minutes: u32) -> Result<(), ValidationError> {
    if interval_minutes == 0 || interval_minutes > MAX_INTERVAL_MINUTES {
        return Err(ValidationError::Invalid(format!(
            "interval must be between 1 and {} minutes",
            MAX_INTERVAL_MINUTES
        )));
    }
    Ok(())
}

/// Checks a campaign body that did not come through the wizard.
pub fn validate_input(
    input: &SeedingCampaignInput,
    now: OffsetDateTime,
) -> Result<SeedingCampaignInput, ValidationError> {
    let wizard = SeedingWizard {
        step: WizardStep::Review,
        name: input.name.clone(),
        channel_id: Some(input.channel_id),
        target_post_id: input.target_post_id.clone(),
        comments: input.comments.clone(),
        start_time: Some(input.start_time),
        interval_minutes: input.interval_minutes,
    };
    wizard.build(now)
}

#[derive(Clone)]
pub struct SeedingService {
    api: ApiClient,
}

impl SeedingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        session: &Session,
        page: u32,
        limit: u32,
    ) -> Result<ResourceList<SeedingCampaign>, ApiError> {
        self.api
            .get_with_query(session, "seeding-campaigns", &[("page", page), ("limit", limit)])
            .await
    }

    pub async fn detail(&self, session: &Session, id: i64) -> Result<SeedingDetail, ApiError> {
        self.api
            .get(session, &format!("seeding-campaigns/{}", id))
            .await
    }

    pub async fn stats(&self, session: &Session, id: i64) -> Result<SeedingStats, ApiError> {
        self.api
            .get(session, &format!("seeding-campaigns/{}/stats", id))
            .await
    }

    pub async fn create(
        &self,
        session: &Session,
        input: &SeedingCampaignInput,
    ) -> Result<SeedingCampaign, ServiceError> {
        let input = validate_input(input, OffsetDateTime::now_utc())?;
        let created: SeedingCampaign = self.api.post(session, "seeding-campaigns", &input).await?;
        info!(campaign_id = created.id, comments = input.comments.len(), "seeding campaign created");
        Ok(created)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: i64,
        input: &SeedingCampaignInput,
    ) -> Result<SeedingCampaign, ServiceError> {
        let input = validate_input(input, OffsetDateTime::now_utc())?;
        Ok(self
            .api
            .put(session, &format!("seeding-campaigns/{}", id), &input)
            .await?)
    }

    pub async fn delete(&self, session: &Session, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(session, &format!("seeding-campaigns/{}", id))
            .await
    }
}
