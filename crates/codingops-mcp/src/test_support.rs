//! Recording fakes shared by the unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codingops_core::{
    CodingApi, CodingConfig, Commit, CommitQuery, ConnectionManager, CreateIssueInput,
    CreateMergeRequestInput, CreateProjectInput, Depot, DepotListQuery, DepotRef, Error, Issue,
    IssueListFilter, MergeRequest, Page, PageInfo, Project, Result,
};
use codingops_git::{GitInspector, GitRunner};

type FailureRule = Box<dyn Fn(&str) -> Option<Error> + Send + Sync>;
type NameRule = Box<dyn Fn(&str) -> String + Send + Sync>;

/// `CodingApi` that records one line per call and answers with canned data.
pub struct RecordingApi {
    calls: Mutex<Vec<String>>,
    fail: FailureRule,
    created_name: NameRule,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::failing(|_| None)
    }

    /// Calls for which `rule` returns an error fail with it.
    pub fn failing(rule: impl Fn(&str) -> Option<Error> + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: Box::new(rule),
            created_name: Box::new(str::to_string),
        }
    }

    /// Created issues report `rule(requested name)` as their name.
    pub fn naming(mut self, rule: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.created_name = Box::new(rule);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> Result<()> {
        let failure = (self.fail)(&call);
        self.calls.lock().unwrap().push(call);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub fn issue(code: u64, name: &str, issue_type: &str) -> Issue {
    Issue {
        code,
        name: name.to_string(),
        issue_type: issue_type.to_string(),
        priority: "1".to_string(),
        description: String::new(),
        parent_code: None,
        status: Some("Open".to_string()),
        assignee: None,
        created_at: None,
    }
}

pub fn page_info(page_number: u32, page_size: u32, total_pages: u32, total_rows: u32) -> PageInfo {
    PageInfo {
        page_number,
        page_size,
        total_pages,
        total_rows,
    }
}

#[async_trait]
impl CodingApi for RecordingApi {
    async fn current_user_id(&self) -> Result<u64> {
        self.record("current_user_id".to_string())?;
        Ok(7)
    }

    async fn list_projects(&self, user_id: u64, name: Option<&str>) -> Result<Vec<Project>> {
        self.record(format!("list_projects:{}:{}", user_id, name.unwrap_or("")))?;
        Ok(vec![Project {
            id: 1,
            name: "demo".to_string(),
            display_name: "Demo".to_string(),
            description: None,
        }])
    }

    async fn create_project(&self, input: CreateProjectInput) -> Result<u64> {
        self.record(format!(
            "create_project:{}:{}:{}",
            input.name,
            input.template.as_str(),
            input.shared
        ))?;
        Ok(99)
    }

    async fn delete_project(&self, project_id: u64) -> Result<()> {
        self.record(format!("delete_project:{}", project_id))
    }

    async fn list_issues(&self, filter: IssueListFilter) -> Result<Vec<Issue>> {
        self.record(format!(
            "list_issues:{}:{}:{}:{}",
            filter.project_name,
            filter.issue_type.as_str(),
            filter.limit,
            filter.offset
        ))?;
        Ok(vec![issue(1, "first", "DEFECT")])
    }

    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue> {
        self.record(format!(
            "create_issue:{}:{}:{}",
            input.name,
            input.issue_type,
            input.parent_code.map(|c| c.to_string()).unwrap_or_default()
        ))?;
        let code = 100 + self.count("create_issue") as u64;
        let name = (self.created_name)(&input.name);
        let mut created = issue(code, &name, input.issue_type.as_str());
        created.parent_code = input.parent_code;
        Ok(created)
    }

    async fn delete_issue(&self, project_name: &str, issue_code: u64) -> Result<()> {
        self.record(format!("delete_issue:{}:{}", project_name, issue_code))
    }

    async fn describe_issue(&self, project_name: &str, issue_code: u64) -> Result<Issue> {
        self.record(format!("describe_issue:{}:{}", project_name, issue_code))?;
        Ok(issue(issue_code, "parent", "REQUIREMENT"))
    }

    async fn list_depots(&self, query: DepotListQuery) -> Result<Page<Depot>> {
        self.record(format!("list_depots:{}", query.project_id))?;
        let depot = |id: u64, name: &str| Depot {
            id,
            name: name.to_string(),
            description: None,
            https_url: format!("https://e.coding.net/team/demo/{}.git", name),
            ssh_url: format!("git@e.coding.net:team/demo/{}.git", name),
            default_branch: "master".to_string(),
            last_push_at: None,
        };
        Ok(Page {
            items: vec![depot(2, "zeta"), depot(1, "alpha")],
            page: page_info(
                query.page_number.unwrap_or(1),
                query.page_size.unwrap_or(20),
                3,
                42,
            ),
        })
    }

    async fn list_commits(&self, query: CommitQuery) -> Result<Page<Commit>> {
        let depot = match &query.depot {
            DepotRef::Id(id) => id.to_string(),
            DepotRef::Path(path) => path.clone(),
        };
        self.record(format!("list_commits:{}:{}", depot, query.git_ref))?;
        Ok(Page {
            items: vec![Commit {
                sha: "0123456789abcdef".to_string(),
                short_message: "Fix build".to_string(),
                full_message: "Fix build\n\nDetails".to_string(),
                author_name: "dev".to_string(),
                commit_date: 1_700_000_000_000,
            }],
            page: page_info(1, 10, 1, 1),
        })
    }

    async fn create_merge_request(&self, input: CreateMergeRequestInput) -> Result<MergeRequest> {
        self.record(format!(
            "create_merge_request:{}:{}:{}",
            input.depot_path, input.src_branch, input.dest_branch
        ))?;
        Ok(MergeRequest {
            id: 500,
            iid: 12,
            merge_id: 3,
            url: "https://e.coding.net/p/demo/d/repo/git/merge/3".to_string(),
            title: input.title,
            description: input.content,
            status: "CANMERGE".to_string(),
            source_branch: input.src_branch,
            dest_branch: input.dest_branch,
            depot_path: input.depot_path,
        })
    }
}

/// Connection manager that hands out `api` for every configuration.
pub fn manager_with(api: Arc<RecordingApi>, config: CodingConfig) -> Arc<ConnectionManager> {
    let manager = ConnectionManager::new(move |_| Ok(Arc::clone(&api) as Arc<dyn CodingApi>));
    manager.initialize(config);
    Arc::new(manager)
}

/// Git runner answering from a table keyed by the joined arguments.
pub struct FakeGit {
    responses: HashMap<String, std::result::Result<String, String>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    pub fn on(mut self, command: &str, result: std::result::Result<&str, &str>) -> Self {
        self.responses.insert(
            command.to_string(),
            result.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    /// A repository on `branch` whose origin is `remote`.
    pub fn repository(branch: &str, remote: &str) -> GitInspector {
        GitInspector::with_runner(
            Self::new()
                .on("rev-parse --is-inside-work-tree", Ok("true"))
                .on("rev-parse --abbrev-ref HEAD", Ok(branch))
                .on("remote get-url origin", Ok(remote)),
        )
    }
}

#[async_trait]
impl GitRunner for FakeGit {
    async fn run(
        &self,
        _dir: &Path,
        args: &'static [&'static str],
    ) -> std::result::Result<String, String> {
        self.responses
            .get(&args.join(" "))
            .cloned()
            .unwrap_or_else(|| Err("fatal: not a git repository".to_string()))
    }
}
