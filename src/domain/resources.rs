use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{check_length, require_text, ValidationError};

const MAX_NAME_LEN: usize = 255;
const MAX_TEXT_LEN: usize = 5000;

/// List envelope used by the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A record managed through a plain CRUD screen.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Path segment shared by the content API and the dashboard routes.
    const PATH: &'static str;
    /// Singular name used in messages.
    const NAME: &'static str;

    fn validate(input: &Self::Input) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Resource for Campaign {
    type Input = CampaignInput;
    const PATH: &'static str = "campaigns";
    const NAME: &'static str = "campaign";

    fn validate(input: &CampaignInput) -> Result<(), ValidationError> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        if let Some(description) = &input.description {
            check_length("description", description, MAX_TEXT_LEN)?;
        }
        // ISO dates compare lexicographically
        if let (Some(start), Some(end)) = (&input.start_date, &input.end_date) {
            if end < start {
                return Err(ValidationError::Invalid(
                    "end date must not be before start date".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hashtag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub usage_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagInput {
    pub name: String,
}

impl Resource for Hashtag {
    type Input = HashtagInput;
    const PATH: &'static str = "hashtags";
    const NAME: &'static str = "hashtag";

    fn validate(input: &HashtagInput) -> Result<(), ValidationError> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        if input.name.trim().chars().any(char::is_whitespace) {
            return Err(ValidationError::Invalid(
                "hashtag must not contain spaces".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaInput {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<i64>,
}

impl Resource for Idea {
    type Input = IdeaInput;
    const PATH: &'static str = "ideas";
    const NAME: &'static str = "idea";

    fn validate(input: &IdeaInput) -> Result<(), ValidationError> {
        require_text("title", &input.title, MAX_NAME_LEN)?;
        if let Some(content) = &input.content {
            check_length("content", content, MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInput {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Resource for Label {
    type Input = LabelInput;
    const PATH: &'static str = "labels";
    const NAME: &'static str = "label";

    fn validate(input: &LabelInput) -> Result<(), ValidationError> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        if let Some(color) = &input.color {
            if !is_hex_color(color) {
                return Err(ValidationError::Invalid(
                    "color must be a #rrggbb value".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A connected Facebook Page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInput {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Resource for Channel {
    type Input = ChannelInput;
    const PATH: &'static str = "channels";
    const NAME: &'static str = "channel";

    fn validate(input: &ChannelInput) -> Result<(), ValidationError> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        if let Some(color) = &input.color {
            if !is_hex_color(color) {
                return Err(ValidationError::Invalid(
                    "color must be a #rrggbb value".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of the platform page-login flow, handed to the API to connect a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConnect {
    pub page_id: String,
    pub page_name: String,
    pub access_token: String,
}

impl ChannelConnect {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("pageId", &self.page_id, MAX_NAME_LEN)?;
        require_text("pageName", &self.page_name, MAX_NAME_LEN)?;
        if self.access_token.trim().is_empty() {
            return Err(ValidationError::Required("accessToken"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Resource for Product {
    type Input = ProductInput;
    const PATH: &'static str = "products";
    const NAME: &'static str = "product";

    fn validate(input: &ProductInput) -> Result<(), ValidationError> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        if let Some(price) = input.price {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError::Invalid(
                    "price must be a non-negative number".to_string(),
                ));
            }
        }
        if let Some(description) = &input.description {
            check_length("description", description, MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
