//! Manual celebration dispatch.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use cheers_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::workspace::require_workspace;
use crate::response::ChannelsResponse;
use crate::state::AppState;

/// POST /api/workspaces/{id}/celebrations/dispatch
///
/// Run today's celebrations for every channel of the workspace now,
/// regardless of posting time. Channels already dispatched for their local
/// date come back with `skipped: true`.
pub async fn dispatch_now(
    State(state): State<AppState>,
    Path(workspace_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_workspace(&state.pool, workspace_id).await?;

    let channels = state
        .dispatcher
        .dispatch_workspace_now(workspace_id, Utc::now())
        .await?;

    tracing::info!(
        workspace_id,
        channels = channels.len(),
        "Manual celebration dispatch finished"
    );

    Ok(Json(ChannelsResponse { channels }))
}
