//! Progress reporting hooks for a playback run.

use tracing::{error, info};

/// Receives human-facing updates as the run advances.
pub trait StatusDisplay: Send + Sync {
    fn status(&self, status: &str, progress: &str);
    fn clicked(&self, question_num: u32, target_id: &str);
    fn finished(&self);
    fn failed(&self, message: &str);
}

/// Display that reports through the log.
#[derive(Debug, Default)]
pub struct TracingDisplay;

impl StatusDisplay for TracingDisplay {
    fn status(&self, status: &str, progress: &str) {
        info!(status, progress, "run status");
    }

    fn clicked(&self, question_num: u32, target_id: &str) {
        info!(question_num, target_id, "clicked");
    }

    fn finished(&self) {
        info!("run finished");
    }

    fn failed(&self, message: &str) {
        error!(message, "run failed");
    }
}

/// Display that swallows everything.
#[derive(Debug, Default)]
pub struct NoopDisplay;

impl StatusDisplay for NoopDisplay {
    fn status(&self, _status: &str, _progress: &str) {}
    fn clicked(&self, _question_num: u32, _target_id: &str) {}
    fn finished(&self) {}
    fn failed(&self, _message: &str) {}
}
