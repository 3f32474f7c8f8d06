use codingops_core::fanout::{self, Outcome};
use codingops_core::{
    Connection, CreateIssueInput, CreatedTask, DecompositionResult, Error, FailedTask,
    IssueListFilter, IssueType, IssueTypeFilter, Result, SubTaskSpec,
};
use codingops_pipeline::{format, ToolResponse};
use tracing::info;

use crate::args::Args;

#[derive(Debug, Clone, PartialEq)]
pub struct ListIssuesParams {
    pub filter: IssueListFilter,
}

impl ListIssuesParams {
    pub fn parse(args: &Args) -> Result<Self> {
        let mut filter = IssueListFilter::new(args.required_str("projectName")?);

        if let Some(issue_type) = args.optional_enum::<IssueTypeFilter>("issueType")? {
            filter.issue_type = issue_type;
        }
        if let Some(limit) = args.optional_positive_u32("limit")? {
            filter.limit = limit;
        }
        if let Some(offset) = args.optional_u32("offset")? {
            filter.offset = offset;
        }
        if let Some(sort_key) = args.optional_str("sortKey")? {
            filter.sort_key = sort_key;
        }
        if let Some(sort_value) = args.optional_str("sortValue")? {
            let sort_value = sort_value.to_uppercase();
            if sort_value != "ASC" && sort_value != "DESC" {
                return Err(Error::InvalidParams(
                    "sortValue must be ASC or DESC".to_string(),
                ));
            }
            filter.sort_value = sort_value;
        }

        Ok(Self { filter })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIssueParams {
    pub input: CreateIssueInput,
}

impl CreateIssueParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            input: CreateIssueInput {
                project_name: args.required_str("projectName")?,
                name: args.required_str("name")?,
                issue_type: args.required_enum::<IssueType>("type")?,
                priority: required_priority(args)?,
                description: args.required_text("description")?,
                parent_code: args.optional_u64("parentCode")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRefParams {
    pub project_name: String,
    pub issue_code: u64,
}

impl IssueRefParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            project_name: args.required_str("projectName")?,
            issue_code: args.required_u64("issueCode")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecomposeIssueParams {
    pub project_name: String,
    pub parent_code: u64,
    pub sub_tasks: Vec<SubTaskSpec>,
}

impl DecomposeIssueParams {
    pub fn parse(args: &Args) -> Result<Self> {
        let project_name = args.required_str("projectName")?;
        let parent_code = args.required_u64("parentIssueCode")?;
        let items = args.required_array("subTasks")?;
        if items.is_empty() {
            return Err(Error::InvalidParams(
                "subTasks must contain at least one task".to_string(),
            ));
        }

        let sub_tasks = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                parse_sub_task(item).map_err(|e| match e {
                    Error::InvalidParams(msg) => {
                        Error::InvalidParams(format!("subTasks[{}].{}", index, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project_name,
            parent_code,
            sub_tasks,
        })
    }
}

fn parse_sub_task(item: &serde_json::Value) -> Result<SubTaskSpec> {
    let args = Args::from_value(Some(item.clone()))
        .map_err(|_| Error::InvalidParams("entry must be an object".to_string()))?;
    Ok(SubTaskSpec {
        name: args.required_str("name")?,
        description: args.optional_str("description")?.unwrap_or_default(),
        priority: required_priority(&args)?,
    })
}

/// Priorities are numeric strings on the wire; bare numbers are accepted.
fn required_priority(args: &Args) -> Result<String> {
    match args.required_str("priority") {
        Err(Error::InvalidParams(msg)) if msg.ends_with("must be a string") => {
            args.required_u64("priority").map(|n| n.to_string())
        }
        other => other,
    }
}

pub async fn list_issues(
    connection: &Connection,
    params: ListIssuesParams,
) -> Result<ToolResponse> {
    let project_name = params.filter.project_name.clone();
    let issues = connection.api().list_issues(params.filter).await?;
    Ok(format::issues(&project_name, &issues))
}

pub async fn create_issue(
    connection: &Connection,
    params: CreateIssueParams,
) -> Result<ToolResponse> {
    let issue = connection.api().create_issue(params.input).await?;
    Ok(format::issue_created(&issue))
}

pub async fn delete_issue(connection: &Connection, params: IssueRefParams) -> Result<ToolResponse> {
    connection
        .api()
        .delete_issue(&params.project_name, params.issue_code)
        .await?;
    Ok(format::issue_deleted(&params.project_name, params.issue_code))
}

pub async fn describe_issue(
    connection: &Connection,
    params: IssueRefParams,
) -> Result<ToolResponse> {
    let issue = connection
        .api()
        .describe_issue(&params.project_name, params.issue_code)
        .await?;
    Ok(format::issue_details(&issue))
}

/// Create one MISSION per sub-task under the parent, in order. A failing
/// sub-task is reported in the result; only a failed parent lookup aborts.
pub async fn decompose_issue(
    connection: &Connection,
    params: DecomposeIssueParams,
) -> Result<ToolResponse> {
    let DecomposeIssueParams {
        project_name,
        parent_code,
        sub_tasks,
    } = params;
    let api = connection.api();

    let parent = api.describe_issue(&project_name, parent_code).await?;
    let total = sub_tasks.len();

    let outcomes: Vec<Outcome<SubTaskSpec, _>> = fanout::run_sequential(sub_tasks, |spec| {
        let input = CreateIssueInput {
            project_name: project_name.clone(),
            name: spec.name.clone(),
            issue_type: IssueType::Mission,
            priority: spec.priority.clone(),
            description: spec.description.clone(),
            parent_code: Some(parent.code),
        };
        async move { api.create_issue(input).await }
    })
    .await;

    let (succeeded, failed) = fanout::partition(
        outcomes,
        |spec, issue| CreatedTask {
            name: if issue.name.is_empty() {
                spec.name
            } else {
                issue.name
            },
            code: issue.code,
        },
        |spec, error| FailedTask {
            task_name: spec.name,
            error: error.to_string(),
        },
    );

    info!(
        parent = parent.code,
        total,
        succeeded = succeeded.len(),
        failed = failed.len(),
        "Issue decomposed"
    );

    let result = DecompositionResult { succeeded, failed };
    Ok(format::decomposition(parent.code, &result))
}
