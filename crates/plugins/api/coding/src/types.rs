//! CODING open API request and response types.
//!
//! These types mirror the raw PascalCase JSON of the action endpoint. They
//! are deserialized and then mapped to unified types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Envelope
// =============================================================================

/// Every response is wrapped in `{"Response": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodingEnvelope {
    #[serde(rename = "Response")]
    pub response: Value,
}

/// In-band error reported with HTTP 200.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingApiError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Request body: the action tag plus flat PascalCase arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest<'a, B: Serialize> {
    #[serde(rename = "Action")]
    pub action: &'a str,
    #[serde(flatten)]
    pub body: B,
}

/// Body for actions without arguments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyRequest {}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingUser {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentUserResponse {
    pub user: CodingUser,
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectListResponse {
    #[serde(default)]
    pub project_list: Vec<CodingProject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProjectResponse {
    pub project_id: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeUserProjectsRequest {
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub git_readme_enabled: bool,
    pub vcs_type: &'static str,
    pub create_svn_layout: bool,
    /// 1 for public, 0 for private
    pub shared: u8,
    pub project_template: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectIdRequest {
    pub project_id: u64,
}

// =============================================================================
// Issues
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingIssueRef {
    pub code: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingIssue {
    pub code: u64,
    pub name: String,
    #[serde(rename = "Type", default)]
    pub issue_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub priority: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_issue: Option<CodingIssueRef>,
    #[serde(default)]
    pub issue_status_name: Option<String>,
    #[serde(default)]
    pub assignee: Option<CodingUser>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssueListResponse {
    #[serde(default)]
    pub issue_list: Vec<CodingIssue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssueResponse {
    pub issue: CodingIssue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeIssueListRequest {
    pub project_name: String,
    pub issue_type: &'static str,
    pub limit: String,
    pub offset: String,
    pub sort_key: String,
    pub sort_value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateIssueRequest {
    pub project_name: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub issue_type: &'static str,
    pub priority: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssueCodeRequest {
    pub project_name: String,
    pub issue_code: u64,
}

// =============================================================================
// Depots and commits
// =============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingPage {
    pub page_number: u32,
    pub page_size: u32,
    pub total_page: u32,
    pub total_row: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingDepot {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub https_url: String,
    #[serde(default)]
    pub ssh_url: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub last_push_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingDepotData {
    #[serde(default)]
    pub depots: Vec<CodingDepot>,
    pub page: CodingPage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepotListResponse {
    pub depot_data: CodingDepotData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingCommit {
    pub sha: String,
    #[serde(default)]
    pub short_message: String,
    #[serde(default)]
    pub full_message: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub commit_date: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingCommitData {
    #[serde(default)]
    pub commits: Vec<CodingCommit>,
    pub page: CodingPage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitListResponse {
    pub data: CodingCommitData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDepotsRequest {
    pub project_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCommitsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depot_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depot_path: Option<String>,
    #[serde(rename = "Ref")]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "KeyWord", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

// =============================================================================
// Merge requests
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingMergeRequestInfo {
    pub id: u64,
    #[serde(default)]
    pub merge_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub describe: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodingMergeInfo {
    pub merge_request_id: u64,
    #[serde(default)]
    pub merge_request_url: String,
    pub merge_request_info: CodingMergeRequestInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeRequestResponse {
    pub merge_info: CodingMergeInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMergeRequestRequest {
    pub depot_path: String,
    pub title: String,
    pub content: String,
    pub src_branch: String,
    pub dest_branch: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// The platform reports priorities as either `"2"` or `2`.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_request_flattens_body() {
        let req = ActionRequest {
            action: "DeleteIssue",
            body: IssueCodeRequest {
                project_name: "demo".to_string(),
                issue_code: 12,
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Action": "DeleteIssue", "ProjectName": "demo", "IssueCode": 12})
        );
    }

    #[test]
    fn test_empty_request() {
        let req = ActionRequest {
            action: "DescribeCodingCurrentUser",
            body: EmptyRequest::default(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"Action":"DescribeCodingCurrentUser"}"#);
    }

    #[test]
    fn test_issue_priority_number_or_string() {
        let numeric: CodingIssue = serde_json::from_value(serde_json::json!({
            "Code": 1, "Name": "a", "Type": "DEFECT", "Priority": 2
        }))
        .unwrap();
        assert_eq!(numeric.priority, "2");

        let text: CodingIssue = serde_json::from_value(serde_json::json!({
            "Code": 1, "Name": "a", "Type": "DEFECT", "Priority": "3"
        }))
        .unwrap();
        assert_eq!(text.priority, "3");

        let missing: CodingIssue = serde_json::from_value(serde_json::json!({
            "Code": 1, "Name": "a"
        }))
        .unwrap();
        assert_eq!(missing.priority, "");
    }

    #[test]
    fn test_commit_request_field_names() {
        let req = DescribeCommitsRequest {
            depot_id: None,
            depot_path: Some("team/proj/repo".to_string()),
            git_ref: "main".to_string(),
            start_date: None,
            end_date: None,
            keyword: Some("fix".to_string()),
            path: None,
            page_number: Some(1),
            page_size: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["Ref"], "main");
        assert_eq!(json["KeyWord"], "fix");
        assert_eq!(json["DepotPath"], "team/proj/repo");
        assert!(json.get("DepotId").is_none());
        assert!(json.get("PageSize").is_none());
    }
}
