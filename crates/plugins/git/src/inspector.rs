use std::path::Path;

use codingops_core::{Error, Result};
use tracing::{debug, warn};

use crate::runner::{GitRunner, ProcessRunner};

type Strategy = &'static [&'static str];

const IS_REPOSITORY: Strategy = &["rev-parse", "--is-inside-work-tree"];

/// Tried in order; the first usable answer wins.
const BRANCH_STRATEGIES: &[Strategy] = &[
    &["rev-parse", "--abbrev-ref", "HEAD"],
    &["branch", "--show-current"],
];

const REMOTE_STRATEGIES: &[Strategy] = &[
    &["remote", "get-url", "origin"],
    &["config", "--get", "remote.origin.url"],
];

/// Branch and remote of a working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitState {
    pub branch: String,
    pub remote_url: String,
}

/// Reads repository state through a [`GitRunner`].
pub struct GitInspector {
    runner: Box<dyn GitRunner>,
}

impl Default for GitInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl GitInspector {
    /// Inspector backed by the `git` executable.
    pub fn new() -> Self {
        Self::with_runner(ProcessRunner)
    }

    pub fn with_runner(runner: impl GitRunner + 'static) -> Self {
        Self {
            runner: Box::new(runner),
        }
    }

    /// Name of the checked-out branch.
    ///
    /// Empty output and a detached `HEAD` count as failed attempts.
    pub async fn current_branch(&self, dir: &Path) -> Result<String> {
        self.first_usable(dir, BRANCH_STRATEGIES, |out| !out.is_empty() && out != "HEAD")
            .await
            .map_err(|reason| {
                Error::InvalidParams(format!(
                    "Failed to determine the current branch ({}). Make sure that:\n\
                     1. \"{}\" is a git repository\n\
                     2. it has at least one commit\n\
                     3. HEAD is not detached",
                    reason,
                    dir.display()
                ))
            })
    }

    /// URL of the `origin` remote.
    pub async fn remote_url(&self, dir: &Path) -> Result<String> {
        self.first_usable(dir, REMOTE_STRATEGIES, |out| !out.is_empty())
            .await
            .map_err(|reason| {
                Error::InvalidParams(format!(
                    "Failed to read the remote URL ({}). Make sure that:\n\
                     1. \"{}\" is a git repository\n\
                     2. a remote is configured (see `git remote -v`)\n\
                     3. the remote is named origin",
                    reason,
                    dir.display()
                ))
            })
    }

    /// Whether `dir` lies inside a work tree.
    pub async fn is_repository(&self, dir: &Path) -> bool {
        match self.runner.run(dir, IS_REPOSITORY).await {
            Ok(out) => out == "true",
            Err(reason) => {
                debug!(dir = %dir.display(), reason = %reason, "Not a git repository");
                false
            }
        }
    }

    /// Branch and remote of the repository at `dir`.
    ///
    /// The repository check runs first; both lookups then run concurrently.
    pub async fn git_config(&self, dir: &Path) -> Result<GitState> {
        if !self.is_repository(dir).await {
            return Err(Error::InvalidParams(format!(
                "\"{}\" is not a git repository. Make sure that:\n\
                 1. the command targets the project directory\n\
                 2. the project has been initialized with `git init`",
                dir.display()
            )));
        }

        let (branch, remote_url) =
            tokio::try_join!(self.current_branch(dir), self.remote_url(dir))?;

        Ok(GitState { branch, remote_url })
    }

    async fn first_usable(
        &self,
        dir: &Path,
        strategies: &'static [Strategy],
        usable: impl Fn(&str) -> bool,
    ) -> std::result::Result<String, String> {
        let mut last_failure = String::from("no strategy attempted");

        for &args in strategies {
            match self.runner.run(dir, args).await {
                Ok(out) if usable(&out) => return Ok(out),
                Ok(out) => {
                    last_failure = format!("`git {}` returned {:?}", args.join(" "), out);
                }
                Err(reason) => last_failure = reason,
            }
            debug!(command = %args.join(" "), reason = %last_failure, "git strategy failed");
        }

        warn!(dir = %dir.display(), reason = %last_failure, "All git strategies failed");
        Err(last_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockGitRunner;
    use std::path::PathBuf;

    fn dir() -> PathBuf {
        PathBuf::from("/work/repo")
    }

    fn expect_command(
        mock: &mut MockGitRunner,
        command: &'static str,
        result: std::result::Result<&'static str, &'static str>,
    ) {
        mock.expect_run()
            .withf(move |_, args| args.join(" ") == command)
            .times(1)
            .returning(move |_, _| {
                result
                    .map(|out| out.to_string())
                    .map_err(|err| err.to_string())
            });
    }

    #[tokio::test]
    async fn test_branch_primary_strategy() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "rev-parse --abbrev-ref HEAD", Ok("feature/login"));

        let inspector = GitInspector::with_runner(mock);
        assert_eq!(inspector.current_branch(&dir()).await.unwrap(), "feature/login");
    }

    #[tokio::test]
    async fn test_branch_falls_back_on_error() {
        let mut mock = MockGitRunner::new();
        expect_command(
            &mut mock,
            "rev-parse --abbrev-ref HEAD",
            Err("fatal: ambiguous argument 'HEAD'"),
        );
        expect_command(&mut mock, "branch --show-current", Ok("main"));

        let inspector = GitInspector::with_runner(mock);
        assert_eq!(inspector.current_branch(&dir()).await.unwrap(), "main");
    }

    #[tokio::test]
    async fn test_branch_detached_head_is_failure() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "rev-parse --abbrev-ref HEAD", Ok("HEAD"));
        expect_command(&mut mock, "branch --show-current", Ok(""));

        let inspector = GitInspector::with_runner(mock);
        match inspector.current_branch(&dir()).await {
            Err(Error::InvalidParams(msg)) => {
                assert!(msg.contains("branch --show-current"));
                assert!(msg.contains("/work/repo"));
                assert!(msg.contains("HEAD is not detached"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_branch_reports_last_failure() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "rev-parse --abbrev-ref HEAD", Err("first failure"));
        expect_command(&mut mock, "branch --show-current", Err("second failure"));

        let inspector = GitInspector::with_runner(mock);
        let err = inspector.current_branch(&dir()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("second failure"));
        assert!(!msg.contains("first failure"));
    }

    #[tokio::test]
    async fn test_remote_falls_back_to_config() {
        let mut mock = MockGitRunner::new();
        expect_command(
            &mut mock,
            "remote get-url origin",
            Err("error: No such remote 'origin'"),
        );
        expect_command(
            &mut mock,
            "config --get remote.origin.url",
            Ok("git@e.coding.net:team/proj/repo.git"),
        );

        let inspector = GitInspector::with_runner(mock);
        assert_eq!(
            inspector.remote_url(&dir()).await.unwrap(),
            "git@e.coding.net:team/proj/repo.git"
        );
    }

    #[tokio::test]
    async fn test_remote_all_strategies_fail() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "remote get-url origin", Err("no remote"));
        expect_command(&mut mock, "config --get remote.origin.url", Ok(""));

        let inspector = GitInspector::with_runner(mock);
        match inspector.remote_url(&dir()).await {
            Err(Error::InvalidParams(msg)) => {
                assert!(msg.contains("remote is named origin"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_git_config_not_a_repository() {
        let mut mock = MockGitRunner::new();
        expect_command(
            &mut mock,
            "rev-parse --is-inside-work-tree",
            Err("fatal: not a git repository"),
        );

        let inspector = GitInspector::with_runner(mock);
        match inspector.git_config(&dir()).await {
            Err(Error::InvalidParams(msg)) => {
                assert!(msg.contains("is not a git repository"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_git_config_inside_git_dir() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "rev-parse --is-inside-work-tree", Ok("false"));

        let inspector = GitInspector::with_runner(mock);
        assert!(inspector.git_config(&dir()).await.is_err());
    }

    #[tokio::test]
    async fn test_git_config_success() {
        let mut mock = MockGitRunner::new();
        expect_command(&mut mock, "rev-parse --is-inside-work-tree", Ok("true"));
        expect_command(&mut mock, "rev-parse --abbrev-ref HEAD", Ok("develop"));
        expect_command(
            &mut mock,
            "remote get-url origin",
            Ok("https://e.coding.net/team/proj/repo.git"),
        );

        let inspector = GitInspector::with_runner(mock);
        let state = inspector.git_config(&dir()).await.unwrap();
        assert_eq!(
            state,
            GitState {
                branch: "develop".to_string(),
                remote_url: "https://e.coding.net/team/proj/repo.git".to_string(),
            }
        );
    }
}
