//! Tool handlers.
//!
//! Every tool has a parameter struct parsed from the argument bag before any
//! connection is obtained, and a handler that receives the connection
//! explicitly.

mod code;
mod issue;
mod project;

use codingops_core::{Connection, Result};
use codingops_git::GitInspector;
use codingops_pipeline::ToolResponse;

use crate::args::Args;
use crate::tools::ToolName;

pub use code::{CreateMergeRequestParams, ListCommitsParams, ListDepotsParams};
pub use issue::{CreateIssueParams, DecomposeIssueParams, IssueRefParams, ListIssuesParams};
pub use project::{CreateProjectParams, DeleteProjectParams, ListProjectsParams};

/// Validated parameters of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolParams {
    ListProjects(ListProjectsParams),
    CreateProject(CreateProjectParams),
    DeleteProject(DeleteProjectParams),
    ListIssues(ListIssuesParams),
    CreateIssue(CreateIssueParams),
    DeleteIssue(IssueRefParams),
    DescribeIssue(IssueRefParams),
    DecomposeIssue(DecomposeIssueParams),
    ListDepots(ListDepotsParams),
    ListCommits(ListCommitsParams),
    CreateMergeRequest(CreateMergeRequestParams),
}

impl ToolParams {
    /// Parse and validate the arguments of `tool`. The first missing or
    /// invalid field is reported.
    pub fn parse(tool: ToolName, args: &Args) -> Result<Self> {
        Ok(match tool {
            ToolName::ListProjects => Self::ListProjects(ListProjectsParams::parse(args)?),
            ToolName::CreateProject => Self::CreateProject(CreateProjectParams::parse(args)?),
            ToolName::DeleteProject => Self::DeleteProject(DeleteProjectParams::parse(args)?),
            ToolName::ListIssues => Self::ListIssues(ListIssuesParams::parse(args)?),
            ToolName::CreateIssue => Self::CreateIssue(CreateIssueParams::parse(args)?),
            ToolName::DeleteIssue => Self::DeleteIssue(IssueRefParams::parse(args)?),
            ToolName::DescribeIssue => Self::DescribeIssue(IssueRefParams::parse(args)?),
            ToolName::DecomposeIssue => Self::DecomposeIssue(DecomposeIssueParams::parse(args)?),
            ToolName::ListDepots => Self::ListDepots(ListDepotsParams::parse(args)?),
            ToolName::ListCommits => Self::ListCommits(ListCommitsParams::parse(args)?),
            ToolName::CreateMergeRequest => {
                Self::CreateMergeRequest(CreateMergeRequestParams::parse(args)?)
            }
        })
    }
}

/// Run the handler matching `params`.
pub async fn execute(
    connection: &Connection,
    git: &GitInspector,
    params: ToolParams,
) -> Result<ToolResponse> {
    match params {
        ToolParams::ListProjects(p) => project::list_projects(connection, p).await,
        ToolParams::CreateProject(p) => project::create_project(connection, p).await,
        ToolParams::DeleteProject(p) => project::delete_project(connection, p).await,
        ToolParams::ListIssues(p) => issue::list_issues(connection, p).await,
        ToolParams::CreateIssue(p) => issue::create_issue(connection, p).await,
        ToolParams::DeleteIssue(p) => issue::delete_issue(connection, p).await,
        ToolParams::DescribeIssue(p) => issue::describe_issue(connection, p).await,
        ToolParams::DecomposeIssue(p) => issue::decompose_issue(connection, p).await,
        ToolParams::ListDepots(p) => code::list_depots(connection, p).await,
        ToolParams::ListCommits(p) => code::list_commits(connection, p).await,
        ToolParams::CreateMergeRequest(p) => code::create_merge_request(connection, git, p).await,
    }
}
