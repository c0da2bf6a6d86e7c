//! Hand URLs and folders to the desktop's default handler
//!
//! Uses xdg-open on Linux, `open` on macOS and `explorer` on Windows.

use std::process::Command;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

/// Only web links and local paths are handed to the opener
pub fn is_openable(target: &str) -> bool {
    let target = target.trim();
    !target.is_empty()
        && (target.starts_with("http://") || target.starts_with("https://") || target.starts_with('/'))
}

/// Open a link in the default browser
pub fn open_url(url: &str) -> Result<(), String> {
    if !is_openable(url) {
        return Err(format!("Refusing to open {:?}", url));
    }
    spawn_detached(OPENER, url.trim()).map_err(|e| format!("Failed to open {}: {}", url, e))?;
    tracing::debug!("Opened {} with {}", url, OPENER);
    Ok(())
}

/// Start `program` without blocking; a thread reaps it once it exits
fn spawn_detached(program: &str, arg: &str) -> std::io::Result<()> {
    let mut child = Command::new(program).arg(arg).spawn()?;
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::warn!("Opener did not exit cleanly: {}", e);
        }
    });
    Ok(())
}
