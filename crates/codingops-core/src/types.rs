//! Unified domain types shared by the API client, the dispatcher and the
//! response pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Projects
// =============================================================================

/// A CODING project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Template a new project is created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectTemplate {
    DevOps,
    DemoBegin,
    ChoiceDemand,
    ProjectManage,
    CodeHost,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 5] = [
        ProjectTemplate::DevOps,
        ProjectTemplate::DemoBegin,
        ProjectTemplate::ChoiceDemand,
        ProjectTemplate::ProjectManage,
        ProjectTemplate::CodeHost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTemplate::DevOps => "DEV_OPS",
            ProjectTemplate::DemoBegin => "DEMO_BEGIN",
            ProjectTemplate::ChoiceDemand => "CHOICE_DEMAND",
            ProjectTemplate::ProjectManage => "PROJECT_MANAGE",
            ProjectTemplate::CodeHost => "CODE_HOST",
        }
    }
}

impl FromStr for ProjectTemplate {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new(s, Self::ALL.iter().map(|t| t.as_str())))
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectInput {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub template: ProjectTemplate,
    pub shared: bool,
}

// =============================================================================
// Issues
// =============================================================================

/// Work item category. Closed set accepted by the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Defect,
    Requirement,
    Mission,
    Epic,
}

impl IssueType {
    pub const ALL: [IssueType; 4] = [
        IssueType::Defect,
        IssueType::Requirement,
        IssueType::Mission,
        IssueType::Epic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Defect => "DEFECT",
            IssueType::Requirement => "REQUIREMENT",
            IssueType::Mission => "MISSION",
            IssueType::Epic => "EPIC",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new(s, Self::ALL.iter().map(|t| t.as_str())))
    }
}

/// Issue type filter for listings: one type or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueTypeFilter {
    #[default]
    All,
    Only(IssueType),
}

impl IssueTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueTypeFilter::All => "ALL",
            IssueTypeFilter::Only(t) => t.as_str(),
        }
    }
}

impl FromStr for IssueTypeFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ALL" {
            return Ok(IssueTypeFilter::All);
        }
        s.parse::<IssueType>().map(IssueTypeFilter::Only).map_err(|_| {
            UnknownVariant::new(
                s,
                std::iter::once("ALL").chain(IssueType::ALL.iter().map(|t| t.as_str())),
            )
        })
    }
}

/// A work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub code: u64,
    pub name: String,
    /// Raw type tag as reported by the platform (may include SUB_TASK).
    #[serde(rename = "type")]
    pub issue_type: String,
    pub priority: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Filter for listing issues. Defaults mirror the remote console.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueListFilter {
    pub project_name: String,
    pub issue_type: IssueTypeFilter,
    pub limit: u32,
    pub offset: u32,
    pub sort_key: String,
    pub sort_value: String,
}

impl IssueListFilter {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const DEFAULT_SORT_KEY: &'static str = "UPDATED_AT";
    pub const DEFAULT_SORT_VALUE: &'static str = "DESC";

    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            issue_type: IssueTypeFilter::All,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
            sort_key: Self::DEFAULT_SORT_KEY.to_string(),
            sort_value: Self::DEFAULT_SORT_VALUE.to_string(),
        }
    }
}

/// Input for creating an issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIssueInput {
    pub project_name: String,
    pub name: String,
    pub issue_type: IssueType,
    pub priority: String,
    pub description: String,
    pub parent_code: Option<u64>,
}

/// Child work item to create under a parent. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTaskSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub priority: String,
}

/// A sub-task that was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub name: String,
    pub code: u64,
}

/// A sub-task whose creation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTask {
    pub task_name: String,
    pub error: String,
}

/// Outcome of decomposing a work item into sub-tasks.
///
/// Both lists keep input order; together they cover every input once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub succeeded: Vec<CreatedTask>,
    pub failed: Vec<FailedTask>,
}

// =============================================================================
// Depots and commits
// =============================================================================

/// Upstream pagination block, mirrored verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_rows: u32,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: PageInfo,
}

/// A hosted repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depot {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub https_url: String,
    pub ssh_url: String,
    pub default_branch: String,
    /// Last push time in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_push_at: Option<i64>,
}

/// Query for listing the depots of a project.
#[derive(Debug, Clone, PartialEq)]
pub struct DepotListQuery {
    pub project_id: u64,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// A commit on a depot branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub short_message: String,
    pub full_message: String,
    pub author_name: String,
    /// Commit time in milliseconds since the Unix epoch.
    pub commit_date: i64,
}

/// How a depot is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepotRef {
    Id(u64),
    /// `team/project/repository`
    Path(String),
}

/// Query for listing commits.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitQuery {
    pub depot: DepotRef,
    pub git_ref: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub keyword: Option<String>,
    pub path: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

// =============================================================================
// Merge requests
// =============================================================================

/// Input for creating a merge request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMergeRequestInput {
    pub depot_path: String,
    pub title: String,
    pub content: String,
    pub src_branch: String,
    pub dest_branch: String,
}

/// A merge request as created on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub id: u64,
    /// Merge request id as reported in the creation envelope.
    pub iid: u64,
    /// Per-depot sequence number shown in the UI.
    pub merge_id: u64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub source_branch: String,
    pub dest_branch: String,
    pub depot_path: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Value outside a closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub expected: Vec<&'static str>,
}

impl UnknownVariant {
    fn new(value: &str, expected: impl Iterator<Item = &'static str>) -> Self {
        Self {
            value: value.to_string(),
            expected: expected.collect(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not one of: {}",
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}
