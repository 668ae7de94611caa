//! Opening files with the platform's default application.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

/// The OS "open this file" action.
pub trait Desktop: Send + Sync {
    /// Hands `path` to the default application.
    ///
    /// # Errors
    ///
    /// Returns the launcher's IO error.
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Opens files through `xdg-open`, `open` or `start`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn open(&self, path: &Path) -> io::Result<()> {
        #[cfg(target_os = "windows")]
        let mut command = {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        };

        #[cfg(target_os = "macos")]
        let mut command = {
            let mut command = Command::new("open");
            command.arg(path);
            command
        };

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let mut command = {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        };

        spawn_reaped(&mut command).map(|_| ())
    }
}

/// Starts `command` and waits on it from a short-lived thread so the child
/// is reaped once it exits.
fn spawn_reaped(command: &mut Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command.spawn()?;
    let pid = child.id();
    thread::Builder::new()
        .name("pipedream-launcher".into())
        .spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) => debug!(pid, %status, "Launcher exited"),
                Err(e) => warn!(pid, "Failed to wait on launcher: {e}"),
            }
            status
        })
}

/// Opens the readme if it exists. Failures are logged and swallowed.
///
/// Returns whether the file was handed to the desktop.
pub fn open_readme(desktop: &dyn Desktop, path: &Path) -> bool {
    if !path.is_file() {
        warn!("Readme not found: {}", path.display());
        return false;
    }
    match desktop.open(path) {
        Ok(()) => {
            info!("Opened {}", path.display());
            true
        }
        Err(e) => {
            warn!("Failed to open {}: {e}", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingDesktop {
        opened: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl Desktop for RecordingDesktop {
        fn open(&self, path: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "no launcher"));
            }
            self.opened.lock().push(path.to_path_buf());
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_launcher_child_is_reaped() {
        let handle = spawn_reaped(&mut Command::new("true")).expect("spawn");
        let status = handle.join().expect("join").expect("wait");
        assert!(status.success());
    }

    #[test]
    fn test_missing_launcher_reports_error() {
        let result = spawn_reaped(&mut Command::new("pipedream-no-such-launcher"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_readme_is_not_fatal() {
        let dir = tempdir().expect("tempdir");
        let desktop = RecordingDesktop::default();
        assert!(!open_readme(&desktop, &dir.path().join("readme.txt")));
        assert!(desktop.opened.lock().is_empty());
    }

    #[test]
    fn test_existing_readme_is_opened() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, "hello").expect("write");

        let desktop = RecordingDesktop::default();
        assert!(open_readme(&desktop, &path));
        assert_eq!(*desktop.opened.lock(), vec![path]);
    }

    #[test]
    fn test_launcher_failure_is_swallowed() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, "hello").expect("write");

        let desktop = RecordingDesktop {
            fail: true,
            ..RecordingDesktop::default()
        };
        assert!(!open_readme(&desktop, &path));
    }
}
