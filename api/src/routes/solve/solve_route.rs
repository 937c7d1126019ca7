use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Json, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tracing::{info, warn};

use quiz_solver::{RunOutcome, SolverPipeline, StreamEvent};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::solve::solve_request::SolveRequest,
};

/// Streaming solve endpoint.
///
/// Extraction and solving run in a background task that feeds a bounded
/// channel; the response streams each event as one SSE data frame. When
/// the client disconnects the receiver drops, the channel closes and
/// the pipeline stops at its next checkpoint.
pub async fn solve_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SolveRequest>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let html = body.html().ok_or(AppError::MissingHtml)?.to_string();

    let (tx, rx) = mpsc::channel::<StreamEvent>(32);

    tokio::spawn(async move {
        let _ = tx
            .send(StreamEvent::status("Extracting questions", "0/0"))
            .await;

        let questions =
            match tokio::task::spawn_blocking(move || quiz_scraper::extract(&html)).await {
                Ok(questions) => questions,
                Err(err) => {
                    warn!(error = %err, "extraction task failed");
                    let _ = tx.send(StreamEvent::error("extraction failed")).await;
                    return;
                }
            };
        info!(count = questions.len(), "questions extracted");

        let pipeline = SolverPipeline::new(
            state.profiles.extraction(),
            state.profiles.solver(),
            state.pacing,
        );
        let outcome = pipeline
            .run_streaming(&questions, &state.context_doc, &tx)
            .await;
        if outcome == RunOutcome::Cancelled {
            info!("client disconnected, solving run cancelled");
        }
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event)
            .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string());
        Ok(Event::default().data(data))
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}
