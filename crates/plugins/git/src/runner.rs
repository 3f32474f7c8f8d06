use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Runs one git command in a directory.
///
/// Success yields trimmed stdout. Failure yields a human-readable reason
/// (stderr, or the exit status when stderr is empty).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(
        &self,
        dir: &Path,
        args: &'static [&'static str],
    ) -> std::result::Result<String, String>;
}

/// Spawns the `git` executable found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl GitRunner for ProcessRunner {
    async fn run(
        &self,
        dir: &Path,
        args: &'static [&'static str],
    ) -> std::result::Result<String, String> {
        let command = args.join(" ");
        debug!(dir = %dir.display(), command = %command, "Running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run `git {}`: {}", command, e))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(format!("`git {}` exited with {}", command, output.status))
        } else {
            Err(stderr)
        }
    }
}
