use tracing::debug;

/// Fire-and-forget desktop notification.
///
/// Uses `osascript` on macOS and `notify-send` on Linux; anywhere else
/// it only logs. Notification failure never affects the server.
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
