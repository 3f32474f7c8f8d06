//! Remote API trait for the CODING DevOps platform.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Commit, CommitQuery, CreateIssueInput, CreateMergeRequestInput, CreateProjectInput, Depot,
    DepotListQuery, Issue, IssueListFilter, MergeRequest, Page, Project,
};

/// One method per remote action. Every call issues exactly one request.
#[async_trait]
pub trait CodingApi: Send + Sync {
    /// Numeric id of the user owning the credential.
    async fn current_user_id(&self) -> Result<u64>;

    /// Projects visible to `user_id`, optionally fuzzy-matched by name.
    async fn list_projects(&self, user_id: u64, name: Option<&str>) -> Result<Vec<Project>>;

    /// Create a project and return its id.
    async fn create_project(&self, input: CreateProjectInput) -> Result<u64>;

    async fn delete_project(&self, project_id: u64) -> Result<()>;

    async fn list_issues(&self, filter: IssueListFilter) -> Result<Vec<Issue>>;

    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue>;

    async fn delete_issue(&self, project_name: &str, issue_code: u64) -> Result<()>;

    async fn describe_issue(&self, project_name: &str, issue_code: u64) -> Result<Issue>;

    async fn list_depots(&self, query: DepotListQuery) -> Result<Page<Depot>>;

    async fn list_commits(&self, query: CommitQuery) -> Result<Page<Commit>>;

    async fn create_merge_request(&self, input: CreateMergeRequestInput) -> Result<MergeRequest>;
}
