use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("[Playback] transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("[Playback] backend unreachable: {0}")]
    Unreachable(String),

    #[error("[Playback] backend reported: {0}")]
    Server(String),

    #[error("[Playback] malformed frame: {0}")]
    Decode(String),

    #[error("[Playback] click target not found: {0}")]
    TargetMissing(String),
}
