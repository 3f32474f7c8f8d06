//! Tool catalogue: names, descriptions and input schemas.

use std::fmt;
use std::str::FromStr;

use codingops_core::{Error, IssueType, ProjectTemplate};
use serde_json::{json, Value};

use crate::protocol::ToolDefinition;

/// Every tool the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListProjects,
    CreateProject,
    DeleteProject,
    ListIssues,
    CreateIssue,
    DeleteIssue,
    DescribeIssue,
    DecomposeIssue,
    ListDepots,
    ListCommits,
    CreateMergeRequest,
}

impl ToolName {
    pub const ALL: [ToolName; 11] = [
        ToolName::ListProjects,
        ToolName::CreateProject,
        ToolName::DeleteProject,
        ToolName::ListIssues,
        ToolName::CreateIssue,
        ToolName::DeleteIssue,
        ToolName::DescribeIssue,
        ToolName::DecomposeIssue,
        ToolName::ListDepots,
        ToolName::ListCommits,
        ToolName::CreateMergeRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListProjects => "list_projects",
            ToolName::CreateProject => "create_project",
            ToolName::DeleteProject => "delete_project",
            ToolName::ListIssues => "list_issues",
            ToolName::CreateIssue => "create_issue",
            ToolName::DeleteIssue => "delete_issue",
            ToolName::DescribeIssue => "describe_issue",
            ToolName::DecomposeIssue => "decompose_issue",
            ToolName::ListDepots => "list_depots",
            ToolName::ListCommits => "list_commits",
            ToolName::CreateMergeRequest => "create_merge_request",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::ListProjects => "List CODING projects visible to the current user",
            ToolName::CreateProject => "Create a CODING project from a template",
            ToolName::DeleteProject => "Delete a CODING project by id",
            ToolName::ListIssues => "List issues of a project, newest updates first",
            ToolName::CreateIssue => "Create an issue in a project",
            ToolName::DeleteIssue => "Delete an issue from a project",
            ToolName::DescribeIssue => "Show the details of one issue",
            ToolName::DecomposeIssue => {
                "Split an issue into sub-tasks created under it; \
                 failed sub-tasks are reported, not fatal"
            }
            ToolName::ListDepots => "List the code repositories (depots) of a project",
            ToolName::ListCommits => "List commits of a depot branch",
            ToolName::CreateMergeRequest => {
                "Create a merge request for a local git checkout; \
                 source branch and depot are read from git"
            }
        }
    }

    pub fn input_schema(&self) -> Value {
        let issue_types: Vec<&str> = IssueType::ALL.iter().map(|t| t.as_str()).collect();
        let issue_filters: Vec<&str> = std::iter::once("ALL")
            .chain(issue_types.iter().copied())
            .collect();
        let templates: Vec<&str> = ProjectTemplate::ALL.iter().map(|t| t.as_str()).collect();

        match self {
            ToolName::ListProjects => json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Filter by project name"
                    }
                }
            }),
            ToolName::CreateProject => json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Project identifier used in URLs"
                    },
                    "displayName": {
                        "type": "string",
                        "description": "Human-readable project name"
                    },
                    "description": {
                        "type": "string",
                        "description": "Project description"
                    },
                    "projectTemplate": {
                        "type": "string",
                        "enum": templates,
                        "description": "Template the project is created from"
                    },
                    "shared": {
                        "type": "string",
                        "enum": ["0", "1"],
                        "description": "1 for a public project, 0 for a private one"
                    }
                },
                "required": ["name", "displayName", "projectTemplate", "shared"]
            }),
            ToolName::DeleteProject => json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "integer",
                        "description": "Id of the project to delete"
                    }
                },
                "required": ["projectId"]
            }),
            ToolName::ListIssues => json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Project name"
                    },
                    "issueType": {
                        "type": "string",
                        "enum": issue_filters,
                        "description": "Issue type filter (default: ALL)"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of issues (default: 20)"
                    },
                    "offset": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of issues to skip (default: 0)"
                    },
                    "sortKey": {
                        "type": "string",
                        "description": "Sort field (default: UPDATED_AT)"
                    },
                    "sortValue": {
                        "type": "string",
                        "enum": ["ASC", "DESC"],
                        "description": "Sort direction (default: DESC)"
                    }
                },
                "required": ["projectName"]
            }),
            ToolName::CreateIssue => json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Project name"
                    },
                    "name": {
                        "type": "string",
                        "description": "Issue title"
                    },
                    "type": {
                        "type": "string",
                        "enum": issue_types,
                        "description": "Issue type"
                    },
                    "priority": {
                        "type": "string",
                        "description": "Priority: 0 low, 1 medium, 2 high, 3 urgent"
                    },
                    "description": {
                        "type": "string",
                        "description": "Issue description"
                    },
                    "parentCode": {
                        "type": "integer",
                        "description": "Code of the parent issue"
                    }
                },
                "required": ["projectName", "name", "type", "priority", "description"]
            }),
            ToolName::DeleteIssue | ToolName::DescribeIssue => json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Project name"
                    },
                    "issueCode": {
                        "type": "integer",
                        "description": "Issue code"
                    }
                },
                "required": ["projectName", "issueCode"]
            }),
            ToolName::DecomposeIssue => json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Project name"
                    },
                    "parentIssueCode": {
                        "type": "integer",
                        "description": "Code of the issue to decompose"
                    },
                    "subTasks": {
                        "type": "array",
                        "minItems": 1,
                        "description": "Sub-tasks to create, in order",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "description": { "type": "string" },
                                "priority": { "type": "string" }
                            },
                            "required": ["name", "priority"]
                        }
                    }
                },
                "required": ["projectName", "parentIssueCode", "subTasks"]
            }),
            ToolName::ListDepots => json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "integer",
                        "description": "Project id"
                    },
                    "pageNumber": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Page number"
                    },
                    "pageSize": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Page size"
                    }
                },
                "required": ["projectId"]
            }),
            ToolName::ListCommits => json!({
                "type": "object",
                "properties": {
                    "depotId": {
                        "type": "integer",
                        "description": "Depot id (either depotId or depotPath is required)"
                    },
                    "depotPath": {
                        "type": "string",
                        "description": "Depot path team/project/repository"
                    },
                    "ref": {
                        "type": "string",
                        "description": "Branch, tag or commit"
                    },
                    "startDate": {
                        "type": "string",
                        "description": "Earliest commit date (YYYY-MM-DD)"
                    },
                    "endDate": {
                        "type": "string",
                        "description": "Latest commit date (YYYY-MM-DD)"
                    },
                    "keyword": {
                        "type": "string",
                        "description": "Search commit messages"
                    },
                    "path": {
                        "type": "string",
                        "description": "Only commits touching this path"
                    },
                    "pageNumber": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Page number"
                    },
                    "pageSize": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Page size"
                    }
                },
                "required": ["ref"]
            }),
            ToolName::CreateMergeRequest => json!({
                "type": "object",
                "properties": {
                    "workingDirectory": {
                        "type": "string",
                        "description": "Path of the local git checkout"
                    },
                    "title": {
                        "type": "string",
                        "description": "Merge request title"
                    },
                    "content": {
                        "type": "string",
                        "description": "Merge request description"
                    },
                    "srcBranch": {
                        "type": "string",
                        "description": "Source branch (default: current branch)"
                    },
                    "destBranch": {
                        "type": "string",
                        "description": "Target branch (default: master)"
                    }
                },
                "required": ["workingDirectory", "title", "content"]
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::MethodNotFound(format!("Unknown tool: {}", s)))
    }
}

/// Definitions of all tools, in catalogue order.
pub fn available_tools() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}
