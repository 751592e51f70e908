//! Handlers for workspace setup, channel configuration, people and the
//! upcoming-celebrations overview.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use cheers_core::channel_settings::{
    parse_timezone, validate_templates, PostingTime, DEFAULT_POSTING_TIME, DEFAULT_TIMEZONE,
};
use cheers_core::error::CoreError;
use cheers_core::person::{validate_birthday_fields, RemindersMode};
use cheers_core::types::DbId;
use cheers_db::models::channel::{UpdateChannelSettings, UpdateChannelTemplates, WorkspaceChannel};
use cheers_db::models::person::UpsertPerson;
use cheers_db::models::workspace::{UpsertWorkspace, Workspace};
use cheers_db::repositories::{ChannelRepo, PersonRepo, WorkspaceRepo};
use cheers_db::DbPool;
use cheers_worker::overview::{self, CelebrationFilter};
use cheers_worker::roster;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{ChannelsResponse, ItemsResponse, PeopleResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BootstrapWorkspaceRequest {
    pub slack_team_id: String,
    pub name: String,
    /// IANA name; blank means UTC.
    #[serde(default)]
    pub timezone: String,
    pub channel_id: String,
    pub channel_name: String,
    /// `HH:MM`; blank means 09:00.
    #[serde(default)]
    pub posting_time: String,
}

#[derive(Debug, Serialize)]
pub struct BootstrapWorkspaceResponse {
    pub workspace: Workspace,
    pub channel: WorkspaceChannel,
}

#[derive(Debug, Deserialize)]
pub struct UpsertPersonRequest {
    pub slack_handle: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    pub birthday_day: Option<i16>,
    pub birthday_month: Option<i16>,
    pub birthday_year: Option<i16>,
    /// `YYYY-MM-DD`; blank clears the hire date.
    #[serde(default)]
    pub hire_date: Option<String>,
    pub public_celebration_opt_in: Option<bool>,
    #[serde(default)]
    pub reminders_mode: String,
}

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    pub days: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a workspace or fail with 404.
pub(crate) async fn require_workspace(pool: &DbPool, id: DbId) -> AppResult<Workspace> {
    WorkspaceRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Workspace",
            id,
        })
    })
}

async fn require_channel(pool: &DbPool, workspace_id: DbId, key: &str) -> AppResult<WorkspaceChannel> {
    ChannelRepo::find_for_workspace(pool, workspace_id, key.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("channel '{key}' not found")))
}

fn require_field(name: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{name} is required")));
    }
    Ok(())
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn parse_hire_date(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest("hire_date must use YYYY-MM-DD".to_string())),
    }
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// POST /api/workspaces/bootstrap
///
/// Ensure the workspace and its default celebration channel exist.
pub async fn bootstrap(
    State(state): State<AppState>,
    Json(input): Json<BootstrapWorkspaceRequest>,
) -> AppResult<impl IntoResponse> {
    require_field("slack_team_id", &input.slack_team_id)?;
    require_field("name", &input.name)?;
    require_field("channel_id", &input.channel_id)?;
    require_field("channel_name", &input.channel_name)?;

    let timezone = parse_timezone(or_default(&input.timezone, DEFAULT_TIMEZONE))?;
    let posting_time = PostingTime::parse(or_default(&input.posting_time, DEFAULT_POSTING_TIME))?;

    let workspace = WorkspaceRepo::upsert(
        &state.pool,
        &UpsertWorkspace {
            slack_team_id: input.slack_team_id.trim().to_string(),
            name: input.name.trim().to_string(),
            timezone: timezone.name().to_string(),
        },
    )
    .await?;

    let channel = ChannelRepo::upsert_default(
        &state.pool,
        workspace.id,
        input.channel_id.trim(),
        input.channel_name.trim(),
        timezone.name(),
        &posting_time.to_string(),
    )
    .await?;

    tracing::info!(
        workspace_id = workspace.id,
        channel_id = channel.id,
        "Workspace bootstrapped"
    );

    Ok((
        StatusCode::CREATED,
        Json(BootstrapWorkspaceResponse { workspace, channel }),
    ))
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// GET /api/workspaces/{id}/channels
pub async fn list_channels(
    State(state): State<AppState>,
    Path(workspace_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_workspace(&state.pool, workspace_id).await?;
    let channels = ChannelRepo::list_by_workspace(&state.pool, workspace_id).await?;
    Ok(Json(ChannelsResponse { channels }))
}

/// PUT /api/workspaces/{id}/channels/{channel}/settings
///
/// `{channel}` is either the numeric channel id or the Slack channel id.
pub async fn update_channel_settings(
    State(state): State<AppState>,
    Path((workspace_id, channel_key)): Path<(DbId, String)>,
    Json(input): Json<UpdateChannelSettings>,
) -> AppResult<impl IntoResponse> {
    let posting_time = PostingTime::parse(&input.posting_time)?;
    let timezone = parse_timezone(&input.timezone)?;
    let channel = require_channel(&state.pool, workspace_id, &channel_key).await?;

    let normalized = UpdateChannelSettings {
        posting_time: posting_time.to_string(),
        timezone: timezone.name().to_string(),
        ..input
    };
    let channel = ChannelRepo::update_settings(&state.pool, channel.id, &normalized).await?;

    tracing::info!(
        workspace_id,
        channel_id = channel.id,
        posting_time = %channel.posting_time,
        timezone = %channel.timezone,
        "Channel settings updated"
    );

    Ok(Json(channel))
}

/// PUT /api/workspaces/{id}/channels/{channel}/templates
pub async fn update_channel_templates(
    State(state): State<AppState>,
    Path((workspace_id, channel_key)): Path<(DbId, String)>,
    Json(input): Json<UpdateChannelTemplates>,
) -> AppResult<impl IntoResponse> {
    validate_templates(&input.birthday_template, &input.anniversary_template)?;
    let channel = require_channel(&state.pool, workspace_id, &channel_key).await?;
    let channel = ChannelRepo::update_templates(&state.pool, channel.id, &input).await?;

    tracing::info!(workspace_id, channel_id = channel.id, "Channel templates updated");

    Ok(Json(channel))
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// GET /api/workspaces/{id}/people
///
/// Stored people merged with the live Slack member list.
pub async fn list_people(
    State(state): State<AppState>,
    Path(workspace_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_workspace(&state.pool, workspace_id).await?;
    let people = roster::list_people(&state.pool, state.directory.as_ref(), workspace_id).await?;
    Ok(Json(PeopleResponse { people }))
}

/// PUT /api/workspaces/{id}/people/{slack_user_id}
///
/// Full replace of one person's record.
pub async fn upsert_person(
    State(state): State<AppState>,
    Path((workspace_id, slack_user_id)): Path<(DbId, String)>,
    Json(input): Json<UpsertPersonRequest>,
) -> AppResult<impl IntoResponse> {
    require_field("slack_user_id", &slack_user_id)?;
    require_field("slack_handle", &input.slack_handle)?;
    require_field("display_name", &input.display_name)?;
    validate_birthday_fields(input.birthday_day, input.birthday_month, input.birthday_year)?;
    let hire_date = parse_hire_date(input.hire_date.as_deref())?;
    let reminders_mode = RemindersMode::parse(&input.reminders_mode)?;

    require_workspace(&state.pool, workspace_id).await?;

    let person = PersonRepo::upsert(
        &state.pool,
        workspace_id,
        &UpsertPerson {
            slack_user_id: slack_user_id.trim().to_string(),
            slack_handle: input.slack_handle.trim().to_string(),
            display_name: input.display_name.trim().to_string(),
            avatar_url: input.avatar_url.trim().to_string(),
            birthday_day: input.birthday_day,
            birthday_month: input.birthday_month,
            birthday_year: input.birthday_year,
            hire_date,
            public_celebration_opt_in: input.public_celebration_opt_in.unwrap_or(true),
            reminders_mode,
        },
    )
    .await?;

    tracing::info!(workspace_id, slack_user_id = %person.slack_user_id, "Person saved");

    Ok(Json(person))
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// GET /api/workspaces/{id}/overview?days=30&type=all
pub async fn overview(
    State(state): State<AppState>,
    Path(workspace_id): Path<DbId>,
    Query(params): Query<OverviewParams>,
) -> AppResult<impl IntoResponse> {
    let days = match params.days.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => 0,
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest("days must be a number".to_string()))?,
    };
    let filter = CelebrationFilter::parse(params.kind.as_deref().unwrap_or_default())?;

    require_workspace(&state.pool, workspace_id).await?;
    let items = overview::overview(&state.pool, workspace_id, Utc::now(), days, filter).await?;

    Ok(Json(ItemsResponse { items }))
}
