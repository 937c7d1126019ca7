//! Single-slot run ownership.

use std::sync::Mutex;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Owns at most one live run.
///
/// Starting a new run signals the previous one to cancel without
/// awaiting it; the old task winds down at its next cancel checkpoint
/// while the new one is already streaming.
#[derive(Default)]
pub struct PlaybackController {
    active: Mutex<Option<ActiveRun>>,
}

struct ActiveRun {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `run` with a fresh cancel receiver, replacing any active run.
    pub fn start<F, Fut>(&self, run: F)
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run(cancel_rx));

        let prior = self
            .active
            .lock()
            .expect("active run lock")
            .replace(ActiveRun { cancel, handle });
        if let Some(prior) = prior {
            debug!("replacing active run");
            let _ = prior.cancel.send(true);
        }
    }

    /// Cancels the active run, if any.
    pub fn stop(&self) {
        if let Some(run) = self.active.lock().expect("active run lock").take() {
            let _ = run.cancel.send(true);
        }
    }

    /// True while a spawned run has not finished.
    pub fn is_active(&self) -> bool {
        self.active
            .lock()
            .expect("active run lock")
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    async fn wait_for_cancel(mut cancel: watch::Receiver<bool>, flag: Arc<AtomicBool>) {
        let _ = cancel.changed().await;
        flag.store(true, Ordering::SeqCst);
    }

    #[tokio::test]
    async fn starting_a_new_run_cancels_the_prior_one() {
        let controller = PlaybackController::new();
        let first_cancelled = Arc::new(AtomicBool::new(false));

        let flag = first_cancelled.clone();
        controller.start(move |cancel| wait_for_cancel(cancel, flag));
        assert!(!first_cancelled.load(Ordering::SeqCst));

        controller.start(|mut cancel| async move {
            let _ = cancel.changed().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(first_cancelled.load(Ordering::SeqCst));
        assert!(controller.is_active());
    }

    #[tokio::test]
    async fn stop_cancels_and_clears_the_slot() {
        let controller = PlaybackController::new();
        let cancelled = Arc::new(AtomicBool::new(false));

        let flag = cancelled.clone();
        controller.start(move |cancel| wait_for_cancel(cancel, flag));
        controller.stop();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cancelled.load(Ordering::SeqCst));
        assert!(!controller.is_active());
    }
}
