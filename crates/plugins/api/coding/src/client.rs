//! CODING open API client implementation.

use async_trait::async_trait;
use codingops_core::{
    CodingApi, CodingConfig, Commit, CommitQuery, CreateIssueInput, CreateMergeRequestInput,
    CreateProjectInput, Depot, DepotListQuery, DepotRef, Error, Issue, IssueListFilter,
    MergeRequest, Page, PageInfo, Project, Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{
    ActionRequest, CodingApiError, CodingCommit, CodingDepot, CodingEnvelope, CodingIssue,
    CodingMergeInfo, CodingPage, CodingProject, CommitListResponse, CreateIssueRequest,
    CreateMergeRequestRequest, CreateProjectRequest, CreateProjectResponse,
    CurrentUserResponse, DepotListResponse, DescribeCommitsRequest, DescribeDepotsRequest,
    DescribeIssueListRequest, DescribeUserProjectsRequest, EmptyRequest, IssueCodeRequest,
    IssueListResponse, IssueResponse, MergeRequestResponse, ProjectIdRequest,
    ProjectListResponse,
};
use crate::DEFAULT_CODING_URL;

const USER_AGENT: &str = concat!("codingops/", env!("CARGO_PKG_VERSION"));

/// CODING open API client.
pub struct CodingClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl CodingClient {
    /// Create a new CODING client against the public endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_CODING_URL, token)
    }

    /// Create a new CODING client with a custom endpoint URL.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from a resolved configuration, applying its timeout.
    pub fn from_config(config: &CodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url().trim_end_matches('/').to_string(),
            token: config.token().to_string(),
            client,
        })
    }

    /// Build request with common headers.
    fn request(&self) -> reqwest::RequestBuilder {
        self.client
            .post(&self.base_url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/json")
    }

    /// Invoke one action and decode the `Response` payload.
    async fn action<B: Serialize, T: DeserializeOwned>(&self, action: &str, body: B) -> Result<T> {
        debug!(url = %self.base_url, action = action, "CODING POST request");

        let response = self
            .request()
            .json(&ActionRequest { action, body })
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(action, response).await
    }

    /// Handle response and map errors, including in-band `Response.Error`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        action: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                action = action,
                message = message,
                "CODING API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        let envelope: CodingEnvelope = response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))?;

        if let Some(raw) = envelope.response.get("Error") {
            let api_error: CodingApiError = serde_json::from_value(raw.clone())
                .map_err(|e| Error::InvalidData(format!("Failed to parse error: {}", e)))?;
            warn!(
                code = api_error.code,
                action = action,
                message = api_error.message,
                "CODING API error response"
            );
            return Err(map_api_error(status.as_u16(), api_error));
        }

        serde_json::from_value(envelope.response).map_err(|e| {
            Error::InvalidData(format!("Failed to parse {} response: {}", action, e))
        })
    }
}

// =============================================================================
// Mapping functions: CODING types -> Unified types
// =============================================================================

fn map_api_error(status: u16, error: CodingApiError) -> Error {
    let message = format!("{}: {}", error.code, error.message);
    if error.code.starts_with("ResourceNotFound") {
        Error::NotFound(message)
    } else if error.code.starts_with("AuthFailure") {
        Error::Unauthorized(message)
    } else {
        Error::Api { status, message }
    }
}

fn map_project(project: CodingProject) -> Project {
    Project {
        id: project.id,
        name: project.name,
        display_name: project.display_name,
        description: project.description.filter(|d| !d.is_empty()),
    }
}

fn map_issue(issue: CodingIssue) -> Issue {
    Issue {
        code: issue.code,
        name: issue.name,
        issue_type: issue.issue_type,
        priority: issue.priority,
        description: issue.description.unwrap_or_default(),
        parent_code: issue.parent_issue.map(|p| p.code).filter(|code| *code != 0),
        status: issue.issue_status_name.filter(|s| !s.is_empty()),
        assignee: issue
            .assignee
            .and_then(|a| a.name)
            .filter(|n| !n.is_empty()),
        created_at: issue.created_at.filter(|t| *t > 0),
    }
}

fn map_page(page: CodingPage) -> PageInfo {
    PageInfo {
        page_number: page.page_number,
        page_size: page.page_size,
        total_pages: page.total_page,
        total_rows: page.total_row,
    }
}

fn map_depot(depot: CodingDepot) -> Depot {
    Depot {
        id: depot.id,
        name: depot.name,
        description: depot.description.filter(|d| !d.is_empty()),
        https_url: depot.https_url,
        ssh_url: depot.ssh_url,
        default_branch: depot.default_branch,
        last_push_at: depot.last_push_at.filter(|t| *t > 0),
    }
}

fn map_commit(commit: CodingCommit) -> Commit {
    Commit {
        sha: commit.sha,
        short_message: commit.short_message,
        full_message: commit.full_message,
        author_name: commit.author_name,
        commit_date: commit.commit_date,
    }
}

fn map_merge_request(info: CodingMergeInfo, input: CreateMergeRequestInput) -> MergeRequest {
    let details = info.merge_request_info;
    MergeRequest {
        id: details.id,
        iid: info.merge_request_id,
        merge_id: details.merge_id,
        url: info.merge_request_url,
        title: if details.title.is_empty() {
            input.title
        } else {
            details.title
        },
        description: if details.describe.is_empty() {
            input.content
        } else {
            details.describe
        },
        status: details.status,
        source_branch: input.src_branch,
        dest_branch: input.dest_branch,
        depot_path: input.depot_path,
    }
}

// =============================================================================
// CodingApi implementation
// =============================================================================

#[async_trait]
impl CodingApi for CodingClient {
    async fn current_user_id(&self) -> Result<u64> {
        let response: CurrentUserResponse = self
            .action("DescribeCodingCurrentUser", EmptyRequest::default())
            .await?;
        Ok(response.user.id)
    }

    async fn list_projects(&self, user_id: u64, name: Option<&str>) -> Result<Vec<Project>> {
        let request = DescribeUserProjectsRequest {
            user_id,
            project_name: name.map(str::to_string),
        };
        let response: ProjectListResponse = self.action("DescribeUserProjects", request).await?;
        Ok(response.project_list.into_iter().map(map_project).collect())
    }

    async fn create_project(&self, input: CreateProjectInput) -> Result<u64> {
        let request = CreateProjectRequest {
            name: input.name,
            display_name: input.display_name,
            description: input.description,
            git_readme_enabled: false,
            vcs_type: "git",
            create_svn_layout: false,
            shared: u8::from(input.shared),
            project_template: input.template.as_str(),
        };
        let response: CreateProjectResponse = self.action("CreateCodingProject", request).await?;
        Ok(response.project_id)
    }

    async fn delete_project(&self, project_id: u64) -> Result<()> {
        let _: serde_json::Value = self
            .action("DeleteOneProject", ProjectIdRequest { project_id })
            .await?;
        Ok(())
    }

    async fn list_issues(&self, filter: IssueListFilter) -> Result<Vec<Issue>> {
        let request = DescribeIssueListRequest {
            project_name: filter.project_name,
            issue_type: filter.issue_type.as_str(),
            limit: filter.limit.to_string(),
            offset: filter.offset.to_string(),
            sort_key: filter.sort_key,
            sort_value: filter.sort_value,
        };
        let response: IssueListResponse = self.action("DescribeIssueList", request).await?;
        Ok(response.issue_list.into_iter().map(map_issue).collect())
    }

    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue> {
        let request = CreateIssueRequest {
            project_name: input.project_name,
            name: input.name,
            issue_type: input.issue_type.as_str(),
            priority: input.priority,
            description: input.description,
            parent_code: input.parent_code,
        };
        let response: IssueResponse = self.action("CreateIssue", request).await?;
        Ok(map_issue(response.issue))
    }

    async fn delete_issue(&self, project_name: &str, issue_code: u64) -> Result<()> {
        let request = IssueCodeRequest {
            project_name: project_name.to_string(),
            issue_code,
        };
        let _: serde_json::Value = self.action("DeleteIssue", request).await?;
        Ok(())
    }

    async fn describe_issue(&self, project_name: &str, issue_code: u64) -> Result<Issue> {
        let request = IssueCodeRequest {
            project_name: project_name.to_string(),
            issue_code,
        };
        let response: IssueResponse = self.action("DescribeIssue", request).await?;
        Ok(map_issue(response.issue))
    }

    async fn list_depots(&self, query: DepotListQuery) -> Result<Page<Depot>> {
        let request = DescribeDepotsRequest {
            project_id: query.project_id,
            page_number: query.page_number,
            page_size: query.page_size,
        };
        let response: DepotListResponse =
            self.action("DescribeProjectDepotInfoList", request).await?;
        let data = response.depot_data;
        Ok(Page {
            items: data.depots.into_iter().map(map_depot).collect(),
            page: map_page(data.page),
        })
    }

    async fn list_commits(&self, query: CommitQuery) -> Result<Page<Commit>> {
        let (depot_id, depot_path) = match query.depot {
            DepotRef::Id(id) => (Some(id), None),
            DepotRef::Path(path) => (None, Some(path)),
        };
        let request = DescribeCommitsRequest {
            depot_id,
            depot_path,
            git_ref: query.git_ref,
            start_date: query.start_date,
            end_date: query.end_date,
            keyword: query.keyword,
            path: query.path,
            page_number: query.page_number,
            page_size: query.page_size,
        };
        let response: CommitListResponse = self.action("DescribeGitCommitInfos", request).await?;
        let data = response.data;
        Ok(Page {
            items: data.commits.into_iter().map(map_commit).collect(),
            page: map_page(data.page),
        })
    }

    async fn create_merge_request(&self, input: CreateMergeRequestInput) -> Result<MergeRequest> {
        let request = CreateMergeRequestRequest {
            depot_path: input.depot_path.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            src_branch: input.src_branch.clone(),
            dest_branch: input.dest_branch.clone(),
        };
        let response: MergeRequestResponse =
            self.action("CreateGitMergeRequest", request).await?;
        Ok(map_merge_request(response.merge_info, input))
    }
}
