use std::path::{Path, PathBuf};

use codingops_core::{
    CommitQuery, Connection, CreateMergeRequestInput, DepotListQuery, DepotRef, Error, Result,
};
use codingops_git::{parse_remote_url, GitInspector};
use codingops_pipeline::{format, ToolResponse};
use tracing::{debug, info};

use crate::args::Args;

/// Target branch when none is given.
pub const DEFAULT_DEST_BRANCH: &str = "master";

#[derive(Debug, Clone, PartialEq)]
pub struct ListDepotsParams {
    pub query: DepotListQuery,
}

impl ListDepotsParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            query: DepotListQuery {
                project_id: args.required_u64("projectId")?,
                page_number: args.optional_positive_u32("pageNumber")?,
                page_size: args.optional_positive_u32("pageSize")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListCommitsParams {
    pub query: CommitQuery,
}

impl ListCommitsParams {
    pub fn parse(args: &Args) -> Result<Self> {
        let depot = match (args.optional_u64("depotId")?, args.optional_str("depotPath")?) {
            (Some(id), _) => DepotRef::Id(id),
            (None, Some(path)) => DepotRef::Path(path),
            (None, None) => {
                return Err(Error::InvalidParams(
                    "depotId or depotPath is required".to_string(),
                ));
            }
        };

        Ok(Self {
            query: CommitQuery {
                depot,
                git_ref: args.required_str("ref")?,
                start_date: args.optional_str("startDate")?,
                end_date: args.optional_str("endDate")?,
                keyword: args.optional_str("keyword")?,
                path: args.optional_str("path")?,
                page_number: args.optional_positive_u32("pageNumber")?,
                page_size: args.optional_positive_u32("pageSize")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMergeRequestParams {
    pub working_directory: PathBuf,
    pub title: String,
    pub content: String,
    pub src_branch: Option<String>,
    pub dest_branch: Option<String>,
}

impl CreateMergeRequestParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            working_directory: PathBuf::from(args.required_str("workingDirectory")?),
            title: args.required_str("title")?,
            content: args.required_text("content")?,
            src_branch: args.optional_str("srcBranch")?,
            dest_branch: args.optional_str("destBranch")?,
        })
    }
}

pub async fn list_depots(
    connection: &Connection,
    params: ListDepotsParams,
) -> Result<ToolResponse> {
    let page = connection.api().list_depots(params.query).await?;
    Ok(format::depots(&page))
}

pub async fn list_commits(
    connection: &Connection,
    params: ListCommitsParams,
) -> Result<ToolResponse> {
    let page = connection.api().list_commits(params.query).await?;
    Ok(format::commits(&page))
}

/// Open a merge request for the checkout at `working_directory`. The depot
/// comes from the `origin` remote, the source branch defaults to the
/// checked-out one.
pub async fn create_merge_request(
    connection: &Connection,
    git: &GitInspector,
    params: CreateMergeRequestParams,
) -> Result<ToolResponse> {
    let dir = resolve_directory(
        connection.config().working_directory(),
        &params.working_directory,
    );
    debug!(dir = %dir.display(), "Creating merge request");

    open_merge_request(connection, git, &dir, params)
        .await
        .map_err(|e| {
            if e.is_classified() {
                e
            } else {
                Error::InvalidParams(format!(
                    "Failed to create merge request: {}. Working directory: {}. \
                     Make sure the directory is a valid git repository with a CODING \
                     remote configured and that your token has permission to create \
                     merge requests in that depot.",
                    e,
                    dir.display()
                ))
            }
        })
}

async fn open_merge_request(
    connection: &Connection,
    git: &GitInspector,
    dir: &Path,
    params: CreateMergeRequestParams,
) -> Result<ToolResponse> {
    let state = git.git_config(dir).await?;
    let remote = parse_remote_url(&state.remote_url);
    let Some(depot_path) = remote.depot_path else {
        return Err(Error::InvalidParams(format!(
            "Could not determine the CODING depot from remote '{}' in {}. \
             Expected a URL ending in team/project/repository.",
            state.remote_url,
            dir.display()
        )));
    };

    let input = CreateMergeRequestInput {
        depot_path,
        title: params.title,
        content: params.content,
        src_branch: params.src_branch.unwrap_or(state.branch),
        dest_branch: params
            .dest_branch
            .unwrap_or_else(|| DEFAULT_DEST_BRANCH.to_string()),
    };

    let mr = connection.api().create_merge_request(input).await?;
    info!(depot = %mr.depot_path, merge_id = mr.merge_id, "Merge request created");
    Ok(format::merge_request(&mr))
}

/// Relative paths are taken relative to the configured base directory.
fn resolve_directory(base: Option<&Path>, dir: &Path) -> PathBuf {
    match base {
        Some(base) if dir.is_relative() => base.join(dir),
        _ => dir.to_path_buf(),
    }
}
