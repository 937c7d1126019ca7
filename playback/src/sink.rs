//! Where resolved answers land.

use crate::error::PlaybackError;

/// Applies one click instruction to whatever holds the page.
pub trait ActionSink: Send + Sync {
    fn perform(
        &self,
        question_num: u32,
        target_id: &str,
    ) -> impl Future<Output = Result<(), PlaybackError>> + Send;
}

/// Sink that records instructions without acting on them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    clicks: std::sync::Mutex<Vec<(u32, String)>>,
}

impl RecordingSink {
    pub fn clicks(&self) -> Vec<(u32, String)> {
        self.clicks.lock().expect("clicks lock").clone()
    }
}

impl ActionSink for RecordingSink {
    async fn perform(&self, question_num: u32, target_id: &str) -> Result<(), PlaybackError> {
        self.clicks
            .lock()
            .expect("clicks lock")
            .push((question_num, target_id.to_string()));
        Ok(())
    }
}
