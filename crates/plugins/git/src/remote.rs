use std::sync::LazyLock;

use regex::Regex;

/// `git@host:team/project/repo.git`, `https://host/team/project/repo.git`
/// and their forms without the `.git` suffix.
static REMOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:/]([\w-]+)/([\w-]+)/([\w-]+)(?:\.git)?$").unwrap());

/// Repository coordinates extracted from a remote URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRepository {
    pub project_name: Option<String>,
    pub depot_name: Option<String>,
    /// `team/project/repository`
    pub depot_path: Option<String>,
}

impl RemoteRepository {
    /// True when the URL did not match.
    pub fn is_empty(&self) -> bool {
        self.depot_path.is_none()
    }
}

/// Parse a remote URL. Input that does not look like a three-segment CODING
/// path yields an empty [`RemoteRepository`].
pub fn parse_remote_url(url: &str) -> RemoteRepository {
    let Some(captures) = REMOTE_PATTERN.captures(url.trim()) else {
        return RemoteRepository::default();
    };

    let team = &captures[1];
    let project = &captures[2];
    let depot = &captures[3];

    RemoteRepository {
        project_name: Some(project.to_string()),
        depot_name: Some(depot.to_string()),
        depot_path: Some(format!("{}/{}/{}", team, project, depot)),
    }
}
