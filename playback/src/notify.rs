//! Desktop-notification display for unattended runs.

use tracing::{debug, error, info};

use crate::display::StatusDisplay;

/// Fire-and-forget desktop notification.
///
/// Uses `osascript` on macOS and `notify-send` on Linux; anywhere else
/// it only logs. Notification failure never affects the run.
pub fn notify(title: &str, message: &str) {
    debug!(title, message, "notify");

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            message.replace('"', "'"),
            title.replace('"', "'")
        );
        let _ = std::process::Command::new("osascript")
            .arg("-e")
            .arg(script)
            .spawn();
    }

    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("notify-send")
            .arg(title)
            .arg(message)
            .spawn();
    }
}

/// Display that logs progress and raises a desktop notification on
/// the terminal states.
#[derive(Debug, Default)]
pub struct NotifyDisplay;

impl StatusDisplay for NotifyDisplay {
    fn status(&self, status: &str, progress: &str) {
        info!(status, progress, "run status");
    }

    fn clicked(&self, question_num: u32, target_id: &str) {
        info!(question_num, target_id, "clicked");
    }

    fn finished(&self) {
        info!("run finished");
        notify("Quiz playback", "Run finished");
    }

    fn failed(&self, message: &str) {
        error!(message, "run failed");
        notify("Quiz playback", message);
    }
}
