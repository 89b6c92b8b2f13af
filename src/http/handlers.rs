use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

use crate::app::calendar::CalendarGrid;
use crate::app::composer::{ComposeAction, Composer, PostDraft};
use crate::app::generation::GenerationService;
use crate::app::media::UploadService;
use crate::app::overview::{Overview, OverviewService};
use crate::app::permissions::{ensure_allowed, ensure_full_access};
use crate::app::posts::PostService;
use crate::app::resources::{ListParams, ResourceService};
use crate::app::schedule::{build_query, compute_has_more, fetch_month, ScheduleFilters};
use crate::app::seeding::SeedingService;
use crate::app::sync::SyncService;
use crate::config::roles::{Affordances, PostAction};
use crate::domain::generation::{GeneratedContent, GenerationRequest};
use crate::domain::media::UploadedFile;
use crate::domain::organization::Organization;
use crate::domain::permission::UserPermission;
use crate::domain::post::{CommentReply, OpenTarget, PostData, PostedReply, ViewMode};
use crate::domain::resources::{Channel, ChannelConnect, Resource, ResourceList};
use crate::domain::seeding::{SeedingCampaign, SeedingCampaignInput, SeedingDetail, SeedingStats};
use crate::domain::session::Session;
use crate::domain::sync::{SyncConfig, SyncConfigInput, SyncPermissionReport};
use crate::http::{AppError, AuthSession};
use crate::AppState;

const MAX_LIST_LIMIT: u32 = 100;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn permission_for(state: &AppState, session: &Session) -> Result<UserPermission, AppError> {
    state.permissions.current(session).await.map_err(|err| {
        tracing::warn!(
            error = ?err,
            org_id = session.org_id,
            user_id = session.user_id,
            "failed to load permissions"
        );
        AppError::from(err)
    })
}

fn ensure_can_manage(permission: &UserPermission, name: &str) -> Result<(), AppError> {
    if permission.affordances().create {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("not allowed to manage {}s", name)))
    }
}

// ---------------------------------------------------------------------------
// Organization context
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub role: i32,
    pub is_owner: bool,
    pub channel_ids: Vec<i64>,
    pub affordances: Affordances,
}

impl From<UserPermission> for PermissionResponse {
    fn from(permission: UserPermission) -> Self {
        Self {
            affordances: permission.affordances(),
            role: permission.role().as_i32(),
            is_owner: permission.is_owner,
            channel_ids: permission.channel_ids,
        }
    }
}

#[derive(Serialize)]
pub struct ContextResponse {
    pub organization: Organization,
    pub permission: PermissionResponse,
}

pub async fn get_permissions(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> Result<Json<PermissionResponse>, AppError> {
    let permission = permission_for(&state, &session).await?;
    Ok(Json(permission.into()))
}

pub async fn get_context(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> Result<Json<ContextResponse>, AppError> {
    let org = state.contexts.switch_to(session).await?;

    Ok(Json(ContextResponse {
        organization: org.organization,
        permission: org.permission.into(),
    }))
}

/// Drops everything cached for the caller in the current organization.
pub async fn logout(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> StatusCode {
    state.contexts.logout(&session).await;
    tracing::info!(org_id = session.org_id, user_id = session.user_id, "session cleared");
    StatusCode::NO_CONTENT
}

pub async fn get_overview(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> Result<Json<Overview>, AppError> {
    let service = OverviewService::new(state.api.clone());
    let overview = service
        .load(&session, state.display_offset)
        .await
        .map_err(|err| {
            tracing::warn!(error = ?err, org_id = session.org_id, "failed to load overview");
            AppError::from(err)
        })?;
    Ok(Json(overview))
}

// ---------------------------------------------------------------------------
// Post schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsQuery {
    pub view: Option<ViewMode>,
    pub page: Option<u32>,
    pub channel_id: Option<i64>,
    pub status: Option<i32>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub month: Option<u8>,
    pub year: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub items: Vec<PostData>,
    pub page: u32,
    pub has_more: bool,
    pub view: ViewMode,
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<Date>, AppError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| AppError::bad_request(format!("invalid {}", field)))
}

fn filters_from(query: &PostsQuery, today: Date) -> Result<ScheduleFilters, AppError> {
    let month = match query.month {
        Some(month) => Month::try_from(month)
            .map_err(|_| AppError::bad_request("month must be between 1 and 12"))?,
        None => today.month(),
    };
    let year = query.year.unwrap_or_else(|| today.year());
    if !(1..=9999).contains(&year) {
        return Err(AppError::bad_request("invalid year"));
    }

    let start_date = parse_date("startDate", query.start_date.as_deref())?;
    let end_date = parse_date("endDate", query.end_date.as_deref())?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(AppError::bad_request("endDate must not be before startDate"));
        }
    }

    Ok(ScheduleFilters {
        channel_id: query.channel_id,
        status: query.status,
        search: query.search.clone().unwrap_or_default(),
        start_date,
        end_date,
        month,
        year,
    })
}

fn today(state: &AppState) -> Date {
    OffsetDateTime::now_utc().to_offset(state.display_offset).date()
}

pub async fn list_posts(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::bad_request("page must be at least 1"));
    }
    let view = query.view.unwrap_or_default();
    let filters = filters_from(&query, today(&state))?;
    let list_query = build_query(&filters, view, page, state.page_size, state.display_offset);

    let service = PostService::new(state.api.clone());
    let result = match view {
        ViewMode::Calendar => {
            fetch_month(&service.for_session(session.clone()), &list_query).await
        }
        ViewMode::List | ViewMode::Grid => service.list(&session, &list_query).await,
    };
    let result = result.map_err(|err| {
        tracing::warn!(error = ?err, org_id = session.org_id, page, "failed to list posts");
        AppError::from(err)
    })?;

    let has_more = match view {
        ViewMode::Calendar => false,
        ViewMode::List | ViewMode::Grid => compute_has_more(&result, page, list_query.limit),
    };
    let items = result
        .items
        .into_iter()
        .map(|raw| PostData::from_raw(raw, state.display_offset))
        .collect();

    Ok(Json(PostListResponse {
        items,
        page,
        has_more,
        view,
    }))
}

pub async fn post_calendar(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<CalendarGrid>, AppError> {
    let filters = filters_from(&query, today(&state))?;
    let list_query = build_query(&filters, ViewMode::Calendar, 1, state.page_size, state.display_offset);

    let source = PostService::new(state.api.clone()).for_session(session.clone());
    let result = fetch_month(&source, &list_query).await.map_err(|err| {
        tracing::warn!(error = ?err, org_id = session.org_id, "failed to load calendar month");
        AppError::from(err)
    })?;
    let truncated = result.has_next == Some(true);
    let posts: Vec<PostData> = result
        .items
        .into_iter()
        .map(|raw| PostData::from_raw(raw, state.display_offset))
        .collect();

    let mut grid = CalendarGrid::build(filters.year, filters.month, &posts, state.display_offset)
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    grid.truncated = truncated;
    Ok(Json(grid))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostData,
    pub open: OpenTarget,
    pub affordances: Affordances,
}

pub async fn get_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let service = PostService::new(state.api.clone());
    let (raw, permission) = futures::try_join!(
        async { service.get_post(&session, post_id).await.map_err(AppError::from) },
        permission_for(&state, &session),
    )?;

    let affordances = permission.affordances_for_channel(raw.channel_id());
    let post = PostData::from_raw(raw, state.display_offset);
    let open = OpenTarget::for_post(&post);

    Ok(Json(PostDetailResponse {
        post,
        open,
        affordances,
    }))
}

#[derive(Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub draft: PostDraft,
    pub action: ComposeAction,
}

pub async fn create_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(payload): Json<ComposeRequest>,
) -> Result<(StatusCode, Json<PostData>), AppError> {
    let permission = permission_for(&state, &session).await?;
    let composer = Composer::new(PostService::new(state.api.clone()));

    let created = composer
        .create(&session, &permission, &payload.draft, payload.action)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PostData::from_raw(created, state.display_offset)),
    ))
}

pub async fn update_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(payload): Json<ComposeRequest>,
) -> Result<Json<PostData>, AppError> {
    let permission = permission_for(&state, &session).await?;
    let composer = Composer::new(PostService::new(state.api.clone()));

    let updated = composer
        .update(&session, &permission, post_id, &payload.draft, payload.action)
        .await?;
    Ok(Json(PostData::from_raw(updated, state.display_offset)))
}

pub async fn delete_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = PostService::new(state.api.clone());

    let post = service.get_post(&session, post_id).await?;
    ensure_allowed(&permission, PostAction::Delete, post.channel_id())?;
    service.delete_post(&session, post_id).await?;
    tracing::info!(post_id, org_id = session.org_id, "post deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostData>, AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = PostService::new(state.api.clone());

    let post = service.get_post(&session, post_id).await?;
    ensure_allowed(&permission, PostAction::Publish, post.channel_id())?;
    let published = service.publish_now(&session, post_id).await?;
    tracing::info!(post_id, org_id = session.org_id, "post published");

    Ok(Json(PostData::from_raw(published, state.display_offset)))
}

pub async fn repost_post(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<(StatusCode, Json<PostData>), AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = PostService::new(state.api.clone());

    let original = service.get_post(&session, post_id).await?;
    ensure_allowed(&permission, PostAction::Repost, original.channel_id())?;
    let copy = service.repost(&session, &original).await?;
    tracing::info!(post_id, copy_id = copy.id, "post reposted as draft");

    Ok((
        StatusCode::CREATED,
        Json(PostData::from_raw(copy, state.display_offset)),
    ))
}

pub async fn reply_to_comment(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i64, String)>,
    Json(payload): Json<CommentReply>,
) -> Result<Json<PostedReply>, AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = PostService::new(state.api.clone());

    let post = service.get_post(&session, post_id).await?;
    ensure_allowed(&permission, PostAction::Publish, post.channel_id())?;
    let reply = service
        .reply_to_comment(&session, post_id, &comment_id, &payload.message)
        .await?;

    Ok(Json(reply))
}

// ---------------------------------------------------------------------------
// Plain resource screens
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    fn params(&self, default_limit: u32) -> Result<ListParams, AppError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::bad_request("page must be at least 1"));
        }
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIST_LIMIT);
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_string);

        Ok(ListParams {
            page,
            limit,
            search,
        })
    }
}

pub async fn list_resources<R: Resource>(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ResourceList<R>>, AppError> {
    let params = query.params(state.page_size)?;
    let service = ResourceService::<R>::new(state.api.clone());
    let list = service.list(&session, &params).await.map_err(|err| {
        tracing::warn!(error = ?err, resource = R::NAME, "failed to list resources");
        AppError::from(err)
    })?;
    Ok(Json(list))
}

pub async fn get_resource<R: Resource>(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<R>, AppError> {
    let service = ResourceService::<R>::new(state.api.clone());
    Ok(Json(service.get(&session, id).await?))
}

pub async fn create_resource<R: Resource>(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(input): Json<R::Input>,
) -> Result<(StatusCode, Json<R>), AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_can_manage(&permission, R::NAME)?;

    let service = ResourceService::<R>::new(state.api.clone());
    let created = service.create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_resource<R: Resource>(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<R::Input>,
) -> Result<Json<R>, AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_can_manage(&permission, R::NAME)?;

    let service = ResourceService::<R>::new(state.api.clone());
    Ok(Json(service.update(&session, id, &input).await?))
}

pub async fn delete_resource<R: Resource>(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_can_manage(&permission, R::NAME)?;

    let service = ResourceService::<R>::new(state.api.clone());
    service.delete(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn connect_channel(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(payload): Json<ChannelConnect>,
) -> Result<(StatusCode, Json<Channel>), AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_full_access(&permission)?;

    let service = ResourceService::<Channel>::new(state.api.clone());
    let channel = service.connect(&session, &payload).await?;
    state.permissions.invalidate_org(session.org_id).await;

    Ok((StatusCode::CREATED, Json(channel)))
}

// ---------------------------------------------------------------------------
// Sync settings
// ---------------------------------------------------------------------------

pub async fn list_sync_configs(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<SyncConfig>>, AppError> {
    let service = SyncService::new(state.api.clone());
    Ok(Json(service.list(&session).await?))
}

pub async fn create_sync_config(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(input): Json<SyncConfigInput>,
) -> Result<(StatusCode, Json<SyncConfig>), AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_full_access(&permission)?;

    let service = SyncService::new(state.api.clone());
    let created = service.create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_sync_config(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SyncConfigInput>,
) -> Result<Json<SyncConfig>, AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_full_access(&permission)?;

    let service = SyncService::new(state.api.clone());
    Ok(Json(service.update(&session, id, &input).await?))
}

pub async fn delete_sync_config(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_full_access(&permission)?;

    let service = SyncService::new(state.api.clone());
    service.delete(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_sync_permission(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SyncPermissionReport>, AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_full_access(&permission)?;

    let service = SyncService::new(state.api.clone());
    Ok(Json(service.check_permission(&session, id).await?))
}

// ---------------------------------------------------------------------------
// Comment seeding
// ---------------------------------------------------------------------------

pub async fn list_seeding(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ResourceList<SeedingCampaign>>, AppError> {
    let params = query.params(state.page_size)?;
    let service = SeedingService::new(state.api.clone());
    Ok(Json(service.list(&session, params.page, params.limit).await?))
}

pub async fn get_seeding(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SeedingDetail>, AppError> {
    let service = SeedingService::new(state.api.clone());
    Ok(Json(service.detail(&session, id).await?))
}

pub async fn seeding_stats(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SeedingStats>, AppError> {
    let service = SeedingService::new(state.api.clone());
    Ok(Json(service.stats(&session, id).await?))
}

pub async fn create_seeding(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(input): Json<SeedingCampaignInput>,
) -> Result<(StatusCode, Json<SeedingCampaign>), AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_allowed(&permission, PostAction::Schedule, Some(input.channel_id))?;

    let service = SeedingService::new(state.api.clone());
    let created = service.create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_seeding(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SeedingCampaignInput>,
) -> Result<Json<SeedingCampaign>, AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = SeedingService::new(state.api.clone());

    let existing = service.detail(&session, id).await?;
    ensure_allowed(&permission, PostAction::Schedule, Some(existing.campaign.channel_id))?;
    ensure_allowed(&permission, PostAction::Schedule, Some(input.channel_id))?;

    Ok(Json(service.update(&session, id, &input).await?))
}

pub async fn delete_seeding(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let permission = permission_for(&state, &session).await?;
    let service = SeedingService::new(state.api.clone());

    let existing = service.detail(&session, id).await?;
    ensure_allowed(&permission, PostAction::Delete, Some(existing.campaign.channel_id))?;

    service.delete(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Uploads and generation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

pub async fn upload_file(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadedFile>), AppError> {
    let permission = permission_for(&state, &session).await?;
    ensure_can_manage(&permission, "upload")?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::bad_request("missing content-type header"))?;

    let service = UploadService::new(state.api.clone(), state.upload_max_bytes);
    let uploaded = service
        .upload(&session, &query.filename, content_type, body)
        .await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

pub async fn generate_content(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    Json(payload): Json<GenerationRequest>,
) -> Result<Json<GeneratedContent>, AppError> {
    let permission = permission_for(&state, &session).await?;
    if !permission.affordances().create {
        return Err(AppError::forbidden("not allowed to create posts"));
    }

    let service = GenerationService::new(state.api.clone());
    Ok(Json(service.generate(&session, &payload).await?))
}
