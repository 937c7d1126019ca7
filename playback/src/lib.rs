//! Consumer side of the solving stream.
//!
//! Connects to the backend, replays the streamed click instructions
//! into an [`ActionSink`] with randomized pacing, and supports
//! cancel-and-replace of in-flight runs.

pub mod client;
pub mod controller;
pub mod display;
pub mod error;
pub mod frame;
pub mod notify;
pub mod pacing;
pub mod run;
pub mod sink;

pub use client::PlaybackClient;
pub use controller::PlaybackController;
pub use display::{NoopDisplay, StatusDisplay, TracingDisplay};
pub use error::PlaybackError;
pub use frame::FrameBuffer;
pub use notify::NotifyDisplay;
pub use pacing::PacingPolicy;
pub use run::{RunEnd, run_events};
pub use sink::{ActionSink, RecordingSink};

use tokio::sync::watch;

/// Full playback of one page: ping, open the stream, replay it.
pub async fn solve_and_play<D, A>(
    client: &PlaybackClient,
    html: &str,
    display: &D,
    sink: &A,
    pacing: PacingPolicy,
    cancel: watch::Receiver<bool>,
) -> Result<RunEnd, PlaybackError>
where
    D: StatusDisplay,
    A: ActionSink,
{
    client.ping().await?;
    let stream = client.solve_events(html).await?;
    run_events(stream, display, sink, pacing, cancel).await
}
