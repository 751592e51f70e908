//! Onboarding DM trigger.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use cheers_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::workspace::require_workspace;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OnboardingParams {
    /// Message members who were already onboarded too.
    #[serde(default)]
    pub force: bool,
}

/// POST /api/workspaces/{id}/onboarding/dm?force=false
pub async fn send_dms(
    State(state): State<AppState>,
    Path(workspace_id): Path<DbId>,
    Query(params): Query<OnboardingParams>,
) -> AppResult<impl IntoResponse> {
    require_workspace(&state.pool, workspace_id).await?;

    let report = state
        .onboarding
        .send_onboarding_dms(workspace_id, params.force)
        .await?;

    Ok(Json(report))
}
