use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderName;

use crate::domain::session::Session;
use crate::http::AppError;
use crate::AppState;

const ORG_ID_HEADER: HeaderName = HeaderName::from_static("x-organization-id");
const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Caller session taken from the bearer token and workspace headers.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AppError::unauthorized("invalid Authorization header"))?;

        let org_id = id_header(parts, &ORG_ID_HEADER, "organization")?;
        let user_id = id_header(parts, &USER_ID_HEADER, "user")?;

        Ok(AuthSession(Session::new(token.trim(), org_id, user_id)))
    }
}

fn id_header(parts: &Parts, name: &HeaderName, label: &str) -> Result<i64, AppError> {
    let value = parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::bad_request(format!("missing {} header", name.as_str())))?;

    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("invalid {} id", label)))
}
