use thiserror::Error;

use crate::config::roles::PostAction;
use crate::domain::validation::ValidationError;
use crate::infra::api::ApiError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("action not permitted: {0:?}")]
    Forbidden(PostAction),

    #[error("{0}")]
    Denied(String),

    #[error("post with status {0} cannot be edited")]
    NotEditable(i32),

    #[error(transparent)]
    Api(#[from] ApiError),
}
