//! End-to-end JSON-RPC sessions over an in-memory transport.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codingops_core::{
    CodingApi, CodingConfig, Commit, CommitQuery, ConnectionManager, CreateIssueInput,
    CreateMergeRequestInput, CreateProjectInput, Depot, DepotListQuery, Error, Issue,
    IssueListFilter, MergeRequest, Page, Project, Result,
};
use codingops_mcp::transport::StdioTransport;
use codingops_mcp::{McpServer, RequestDispatcher};
use serde_json::{json, Value};

/// Answers identity and project lookups; every other call fails upstream.
struct ProjectsOnly;

#[async_trait]
impl CodingApi for ProjectsOnly {
    async fn current_user_id(&self) -> Result<u64> {
        Ok(1)
    }
    async fn list_projects(&self, _: u64, _: Option<&str>) -> Result<Vec<Project>> {
        Ok(vec![Project {
            id: 11,
            name: "shop".into(),
            display_name: "Shop".into(),
            description: Some("Storefront".into()),
        }])
    }
    async fn create_project(&self, _: CreateProjectInput) -> Result<u64> {
        Err(upstream())
    }
    async fn delete_project(&self, _: u64) -> Result<()> {
        Err(upstream())
    }
    async fn list_issues(&self, _: IssueListFilter) -> Result<Vec<Issue>> {
        Err(upstream())
    }
    async fn create_issue(&self, _: CreateIssueInput) -> Result<Issue> {
        Err(upstream())
    }
    async fn delete_issue(&self, _: &str, _: u64) -> Result<()> {
        Err(Error::Unauthorized("token expired".into()))
    }
    async fn describe_issue(&self, _: &str, _: u64) -> Result<Issue> {
        Err(upstream())
    }
    async fn list_depots(&self, _: DepotListQuery) -> Result<Page<Depot>> {
        Err(upstream())
    }
    async fn list_commits(&self, _: CommitQuery) -> Result<Page<Commit>> {
        Err(upstream())
    }
    async fn create_merge_request(&self, _: CreateMergeRequestInput) -> Result<MergeRequest> {
        Err(upstream())
    }
}

fn upstream() -> Error {
    Error::Api {
        status: 502,
        message: "bad gateway".into(),
    }
}

#[derive(Clone, Default)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn request(id: u64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

fn call(id: u64, tool: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": tool, "arguments": arguments}))
}

async fn session(lines: &[String]) -> Vec<Value> {
    let manager = ConnectionManager::new(|_| Ok(Arc::new(ProjectsOnly) as Arc<dyn CodingApi>));
    manager.initialize(CodingConfig::new("token").unwrap());
    let mut server = McpServer::new(RequestDispatcher::new(Arc::new(manager)));

    let input = lines.join("\n") + "\n";
    let output = SharedWriter::default();
    let transport = StdioTransport::new(
        Box::new(Cursor::new(input.into_bytes())),
        Box::new(output.clone()),
    );

    server.run_with(transport).await.unwrap();

    let written = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
    written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_full_session() {
    let responses = session(&[
        request(
            1,
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "it", "version": "0"}
            }),
        ),
        r#"{"jsonrpc":"2.0","method":"initialized"}"#.to_string(),
        String::new(),
        request(2, "tools/list", json!({})),
        call(3, "list_projects", json!({})),
    ])
    .await;

    // The notification gets no answer
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "codingops");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 11);

    let content = &responses[2]["result"]["content"];
    assert_eq!(content[0]["text"], "Found 1 project(s).");
    assert!(content[1]["text"]
        .as_str()
        .unwrap()
        .contains("| 11 | shop | Shop | Storefront |"));
    assert_eq!(responses[2]["result"]["_meta"]["count"], 1);
}

#[tokio::test]
async fn test_error_codes() {
    let responses = session(&[
        call(1, "nope", json!({})),
        call(2, "create_issue", json!({"projectName": "shop"})),
        call(3, "delete_project", json!({"projectId": 4})),
        call(4, "delete_issue", json!({"projectName": "shop", "issueCode": 2})),
    ])
    .await;

    assert_eq!(responses[0]["error"]["code"], -32601);

    assert_eq!(responses[1]["error"]["code"], -32602);
    assert_eq!(responses[1]["error"]["message"], "Invalid params: name is required");

    assert_eq!(responses[2]["error"]["code"], -32603);
    assert_eq!(responses[2]["error"]["data"]["kind"], "internal");
    assert!(responses[2]["error"]["message"]
        .as_str()
        .unwrap()
        .contains("bad gateway"));

    assert_eq!(responses[3]["error"]["code"], -32603);
    assert_eq!(responses[3]["error"]["data"]["kind"], "authentication");
    assert_eq!(responses[3]["error"]["data"]["status"], 401);
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_server() {
    let responses = session(&[
        "this is not json".to_string(),
        request(9, "ping", json!({})),
    ])
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], 9);
    assert_eq!(responses[1]["result"], json!({}));
}
