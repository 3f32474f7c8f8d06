//! Builders turning domain results into [`ToolResponse`]s.

use codingops_core::{
    Commit, DecompositionResult, Depot, Issue, MergeRequest, Page, PageInfo, Project,
};
use serde_json::json;

use crate::markdown::{format_millis, format_seconds};
use crate::response::{ContentBlock, ToolResponse};
use crate::truncation::short_sha;

// =============================================================================
// Projects
// =============================================================================

pub fn projects(projects: &[Project]) -> ToolResponse {
    if projects.is_empty() {
        return ToolResponse::text("No projects found.");
    }

    let rows = projects
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.display_name.clone(),
                p.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    ToolResponse::text(format!("Found {} project(s).", projects.len()))
        .with_block(ContentBlock::table(
            &["ID", "Name", "Display name", "Description"],
            rows,
        ))
        .with_metadata(json!({ "count": projects.len() }))
}

pub fn project_created(name: &str, id: u64) -> ToolResponse {
    ToolResponse::text(format!("Created project {} with id {}.", name, id))
        .with_metadata(json!({ "projectId": id }))
}

pub fn project_deleted(id: u64) -> ToolResponse {
    ToolResponse::text(format!("Deleted project {}.", id))
}

// =============================================================================
// Issues
// =============================================================================

pub fn issues(project_name: &str, issues: &[Issue]) -> ToolResponse {
    if issues.is_empty() {
        return ToolResponse::text(format!("No issues found in project {}.", project_name));
    }

    let rows = issues
        .iter()
        .map(|i| {
            vec![
                format!("#{}", i.code),
                i.name.clone(),
                i.issue_type.clone(),
                i.priority.clone(),
                i.status.clone().unwrap_or_default(),
                i.assignee.clone().unwrap_or_default(),
            ]
        })
        .collect();

    ToolResponse::text(format!(
        "Found {} issue(s) in project {}.",
        issues.len(),
        project_name
    ))
    .with_block(ContentBlock::table(
        &["Code", "Name", "Type", "Priority", "Status", "Assignee"],
        rows,
    ))
    .with_metadata(json!({ "count": issues.len() }))
}

pub fn issue_created(issue: &Issue) -> ToolResponse {
    ToolResponse::text(format!("Created issue #{}: {}", issue.code, issue.name))
        .with_metadata(json!({ "issue": { "name": issue.name, "code": issue.code } }))
}

pub fn issue_deleted(project_name: &str, code: u64) -> ToolResponse {
    ToolResponse::text(format!(
        "Deleted issue #{} from project {}.",
        code, project_name
    ))
}

pub fn issue_details(issue: &Issue) -> ToolResponse {
    let mut lines = vec![
        format!("## #{} {}", issue.code, issue.name),
        String::new(),
        format!("- Type: {}", issue.issue_type),
        format!("- Status: {}", issue.status.as_deref().unwrap_or("N/A")),
        format!("- Priority: {}", issue.priority),
        format!(
            "- Assignee: {}",
            issue.assignee.as_deref().unwrap_or("Unassigned")
        ),
    ];
    if let Some(created_at) = issue.created_at {
        lines.push(format!("- Created: {}", format_millis(created_at)));
    }
    if let Some(parent) = issue.parent_code {
        lines.push(format!("- Parent: #{}", parent));
    }
    lines.push(String::new());
    lines.push(if issue.description.trim().is_empty() {
        "No description.".to_string()
    } else {
        issue.description.clone()
    });

    ToolResponse::text(lines.join("\n")).with_metadata(json!({ "issue": issue }))
}

pub fn decomposition(parent_code: u64, result: &DecompositionResult) -> ToolResponse {
    let total = result.succeeded.len() + result.failed.len();
    let mut text = format!(
        "Decomposed issue #{}: {} of {} sub-task(s) created.",
        parent_code,
        result.succeeded.len(),
        total
    );

    if !result.succeeded.is_empty() {
        text.push_str("\n\nCreated:");
        for task in &result.succeeded {
            text.push_str(&format!("\n- {} (#{})", task.name, task.code));
        }
    }

    if !result.failed.is_empty() {
        text.push_str("\n\nFailed:");
        for task in &result.failed {
            text.push_str(&format!("\n- {}: {}", task.task_name, task.error));
        }
    }

    ToolResponse::text(text).with_metadata(json!({
        "parentCode": parent_code,
        "succeeded": result.succeeded,
        "failed": result.failed,
    }))
}

// =============================================================================
// Depots and commits
// =============================================================================

fn page_summary(page: &PageInfo, noun: &str) -> String {
    format!(
        "Total {} {}, page {}/{}.",
        page.total_rows, noun, page.page_number, page.total_pages
    )
}

pub fn depots(depots: &Page<Depot>) -> ToolResponse {
    let rows = depots
        .items
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                d.description.clone().unwrap_or_default(),
                d.https_url.clone(),
                d.ssh_url.clone(),
                d.default_branch.clone(),
                d.last_push_at.map(format_seconds).unwrap_or_default(),
            ]
        })
        .collect();

    ToolResponse::new()
        .with_block(ContentBlock::table(
            &[
                "ID",
                "Name",
                "Description",
                "HTTPS URL",
                "SSH URL",
                "Default branch",
                "Last push",
            ],
            rows,
        ))
        .with_block(ContentBlock::text(page_summary(&depots.page, "depot(s)")))
        .with_metadata(json!({ "page": depots.page }))
}

pub fn commits(commits: &Page<Commit>) -> ToolResponse {
    let rows = commits
        .items
        .iter()
        .map(|c| {
            vec![
                short_sha(&c.sha).to_string(),
                c.short_message.clone(),
                c.author_name.clone(),
                format_millis(c.commit_date),
            ]
        })
        .collect();

    ToolResponse::new()
        .with_block(ContentBlock::table(
            &["Commit", "Message", "Author", "Date"],
            rows,
        ))
        .with_block(ContentBlock::text(page_summary(&commits.page, "commit(s)")))
        .with_metadata(json!({ "page": commits.page }))
}

// =============================================================================
// Merge requests
// =============================================================================

pub fn merge_request(mr: &MergeRequest) -> ToolResponse {
    ToolResponse::text(format!("Created merge request #{}.", mr.iid))
        .with_block(ContentBlock::text(format!(
            "Merging {} into {} in {}.",
            mr.source_branch, mr.dest_branch, mr.depot_path
        )))
        .with_block(ContentBlock::text(format!("Details: {}", mr.url)))
        .with_metadata(json!({ "mergeRequest": mr }))
}
