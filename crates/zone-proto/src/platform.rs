use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::task::JoinHandle;
use tracing::debug;

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/zonedeck/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("zonedeck")
    }
    #[cfg(windows)]
    {
        // On Windows, check for portable data directory in executable directory first
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_data = exe_dir.join("data");
                if portable_data.exists() {
                    return portable_data;
                }
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zonedeck")
    }
}

pub fn config_dir() -> PathBuf {
    // On Windows, check for portable config.toml in executable directory first
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("zonedeck")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zonedeck")
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Session-scoped state goes away with the login session. The per-user runtime dir
/// (`$XDG_RUNTIME_DIR`) is preferred; the shared temp dir is only a fallback.
pub fn session_file() -> PathBuf {
    session_file_in(dirs::runtime_dir())
}

fn session_file_in(runtime_dir: Option<PathBuf>) -> PathBuf {
    let base = match runtime_dir {
        Some(dir) => dir.join("zonedeck"),
        None => temp_dir().join(format!("zonedeck-{}", user_tag())),
    };
    base.join("session.json")
}

fn user_tag() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}

/// Create `dir` if needed and, on Unix, restrict it to the current user.
///
/// Fails when the directory belongs to someone else, since only the owner
/// may change its mode.
pub fn ensure_private_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

pub fn preferences_file() -> PathBuf {
    data_dir().join("preferences.json")
}

pub fn log_file() -> PathBuf {
    data_dir().join("zonedeck.log")
}

#[cfg(target_os = "macos")]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("open", &[])
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("xdg-open", &[])
}

#[cfg(windows)]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("cmd", &["/C", "start", ""])
}

/// Hand `url` to the desktop's default browser without blocking the caller.
/// Must be called from inside a tokio runtime.
pub fn open_in_browser(url: &str) -> anyhow::Result<()> {
    let (program, args) = opener();
    spawn_reaped(program, args, url)?;
    Ok(())
}

/// Spawn a helper process and reap it on a background task, so no zombie is
/// left behind once the opener exits.
fn spawn_reaped(
    program: &str,
    args: &[&str],
    url: &str,
) -> anyhow::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let program = program.to_string();
    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => {
                debug!("{} exited with {}", program, status);
                Some(status)
            }
            Err(e) => {
                debug!("failed to wait for {}: {}", program, e);
                None
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_prefers_runtime_dir() {
        let runtime = PathBuf::from("/run/user/1000");
        assert_eq!(
            session_file_in(Some(runtime)),
            PathBuf::from("/run/user/1000/zonedeck/session.json")
        );

        let fallback = session_file_in(None);
        assert!(fallback.starts_with(temp_dir()));
        let dir = fallback.parent().unwrap().file_name().unwrap().to_string_lossy();
        assert!(dir.starts_with("zonedeck-"), "{}", dir);
    }

    #[cfg(unix)]
    #[test]
    fn private_dir_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("session");
        ensure_private_dir(&dir).unwrap();
        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn spawned_helper_is_waited_on() {
        let handle = spawn_reaped("true", &[], "http://127.0.0.1/").unwrap();
        let status = handle.await.unwrap().expect("exit status");
        assert!(status.success());
    }
}
