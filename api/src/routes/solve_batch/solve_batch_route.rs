use std::sync::Arc;

use axum::{
    Json,
    extract::State,
};
use tracing::info;

use quiz_solver::SolverPipeline;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{solve::solve_request::SolveRequest, solve_batch::solve_batch_response::SolveBatchResponse},
};

/// Non-streaming solve endpoint, kept for callers that cannot consume
/// SSE. Failed questions are skipped, so the target list may be
/// partial.
pub async fn solve_batch_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SolveRequest>,
) -> AppResult<Json<SolveBatchResponse>> {
    let html = body.html().ok_or(AppError::MissingHtml)?.to_string();

    let questions = tokio::task::spawn_blocking(move || quiz_scraper::extract(&html)).await?;
    info!(count = questions.len(), "questions extracted");

    let pipeline = SolverPipeline::new(
        state.profiles.extraction(),
        state.profiles.solver(),
        state.pacing,
    );
    let targets = pipeline.run_batch(&questions, &state.context_doc).await;
    crate::notify::notify(
        "Quiz backend",
        &format!("Batch run finished: {} answers", targets.len()),
    );

    Ok(Json(SolveBatchResponse {
        success: true,
        targets,
    }))
}
