//! Submission routes. Each handler relays one lifecycle activity.
//!
//! Mutating activities run on their own task: once a create, update or delete
//! has started it finishes (or compensates) even if the client goes away.

use std::future::Future;

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::domains::submissions::activities::{
    create_submission, delete_submission, get_submission, get_submissions, update_submission,
};
use crate::domains::submissions::{
    CreateSubmissionInput, SubmissionData, SubmissionError, SubmissionFilter, SubmissionStatus,
    UpdateSubmissionInput,
};
use crate::server::app::AppState;
use crate::server::middleware::Actor;
use crate::server::routes::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /submissions
pub async fn create_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(input): Json<CreateSubmissionInput>,
) -> ApiResponse<SubmissionData> {
    let deps = state.deps.clone();
    detached(async move { create_submission(input, actor, &deps).await })
        .await
        .into()
}

/// GET /submissions
pub async fn list_submissions_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> ApiResponse<Vec<SubmissionData>> {
    let filter = SubmissionFilter::new(query.status, query.limit, query.offset);
    get_submissions(filter, &state.deps)
        .await
        .map(|rows| rows.into_iter().map(SubmissionData::from).collect::<Vec<_>>())
        .into()
}

/// GET /submissions/:id
pub async fn get_submission_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<SubmissionData> {
    get_submission(id, &state.deps).await.into()
}

/// PATCH /submissions/:id
pub async fn update_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSubmissionInput>,
) -> ApiResponse<SubmissionData> {
    let deps = state.deps.clone();
    detached(async move { update_submission(id, input, actor, &deps).await })
        .await
        .into()
}

/// DELETE /submissions/:id
pub async fn delete_submission_handler(
    Extension(state): Extension<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResponse<SubmissionData> {
    let deps = state.deps.clone();
    detached(async move { delete_submission(id, actor, &deps).await })
        .await
        .into()
}

/// Run a lifecycle activity to completion on its own task.
async fn detached<T, F>(activity: F) -> Result<T, SubmissionError>
where
    F: Future<Output = Result<T, SubmissionError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(activity).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Lifecycle task did not complete");
            Err(SubmissionError::Internal(anyhow::anyhow!(
                "Lifecycle task did not complete: {}",
                e
            )))
        }
    }
}
