//! Event dispatch loop for one streaming run.

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::time::sleep;

use quiz_solver::StreamEvent;

use crate::{
    display::StatusDisplay, error::PlaybackError, frame::FrameBuffer, pacing::PacingPolicy,
    sink::ActionSink,
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Done,
    Cancelled,
}

/// Drives one run to its terminal frame.
///
/// Every await point also watches the cancel channel, so a cancelled
/// run stops mid-delay without performing further clicks. A stream
/// that ends without a terminal frame is an error.
pub async fn run_events<S, D, A>(
    mut stream: S,
    display: &D,
    sink: &A,
    pacing: PacingPolicy,
    mut cancel: watch::Receiver<bool>,
) -> Result<RunEnd, PlaybackError>
where
    S: Stream<Item = Result<Vec<u8>, PlaybackError>> + Unpin,
    D: StatusDisplay,
    A: ActionSink,
{
    let mut frames = FrameBuffer::new();

    loop {
        let chunk = tokio::select! {
            _ = cancel.changed() => return Ok(RunEnd::Cancelled),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = chunk else {
            return Err(PlaybackError::Decode(
                "stream ended without a terminal frame".into(),
            ));
        };

        for payload in frames.push(&chunk?) {
            let event: StreamEvent = serde_json::from_str(&payload)
                .map_err(|err| PlaybackError::Decode(format!("{err}: {payload}")))?;

            match event {
                StreamEvent::Status { status, progress } => display.status(&status, &progress),
                StreamEvent::Result {
                    question_num,
                    target_id,
                } => {
                    let delay = pacing.delay();
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = cancel.changed() => return Ok(RunEnd::Cancelled),
                            _ = sleep(delay) => {}
                        }
                    }
                    tokio::select! {
                        _ = cancel.changed() => return Ok(RunEnd::Cancelled),
                        result = sink.perform(question_num, &target_id) => result?,
                    }
                    display.clicked(question_num, &target_id);
                }
                StreamEvent::Done { .. } => {
                    display.finished();
                    return Ok(RunEnd::Done);
                }
                StreamEvent::Error { error } => {
                    display.failed(&error);
                    return Err(PlaybackError::Server(error));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    use crate::{display::NoopDisplay, sink::RecordingSink};

    fn chunks(frames: &[&str]) -> Vec<Result<Vec<u8>, PlaybackError>> {
        frames
            .iter()
            .map(|frame| Ok(format!("data: {frame}\n\n").into_bytes()))
            .collect()
    }

    #[tokio::test]
    async fn dispatches_clicks_in_order_until_done() {
        let source = stream::iter(chunks(&[
            r#"{"status":"Solving question 1","progress":"1/2"}"#,
            r#"{"questionNum":1,"targetId":"a"}"#,
            r#"{"questionNum":2,"targetId":"b"}"#,
            r#"{"done":true}"#,
        ]));
        let sink = RecordingSink::default();
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let end = run_events(source, &NoopDisplay, &sink, PacingPolicy::none(), cancel_rx)
            .await
            .unwrap();

        assert_eq!(end, RunEnd::Done);
        assert_eq!(
            sink.clicks(),
            vec![(1, "a".to_string()), (2, "b".to_string())]
        );
    }

    #[tokio::test]
    async fn error_frame_stops_the_run() {
        let source = stream::iter(chunks(&[r#"{"error":"model unavailable"}"#]));
        let sink = RecordingSink::default();
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let result = run_events(source, &NoopDisplay, &sink, PacingPolicy::none(), cancel_rx).await;

        assert!(matches!(result, Err(PlaybackError::Server(msg)) if msg == "model unavailable"));
        assert!(sink.clicks().is_empty());
    }

    #[tokio::test]
    async fn cancellation_wins_over_a_silent_stream() {
        let source = stream::pending::<Result<Vec<u8>, PlaybackError>>();
        let sink = RecordingSink::default();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();

        let end = run_events(source, &NoopDisplay, &sink, PacingPolicy::none(), cancel_rx)
            .await
            .unwrap();

        assert_eq!(end, RunEnd::Cancelled);
    }

    #[tokio::test]
    async fn dropped_cancel_sender_counts_as_cancellation() {
        let source = stream::pending::<Result<Vec<u8>, PlaybackError>>();
        let sink = RecordingSink::default();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        drop(cancel_tx);

        let end = run_events(source, &NoopDisplay, &sink, PacingPolicy::none(), cancel_rx)
            .await
            .unwrap();

        assert_eq!(end, RunEnd::Cancelled);
    }

    #[tokio::test]
    async fn truncated_stream_is_an_error() {
        let source = stream::iter(chunks(&[r#"{"status":"Solving","progress":"1/1"}"#]));
        let sink = RecordingSink::default();
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let result = run_events(source, &NoopDisplay, &sink, PacingPolicy::none(), cancel_rx).await;
        assert!(matches!(result, Err(PlaybackError::Decode(_))));
    }
}
