//! Routes tool calls to handlers.
//!
//! Arguments are validated before a connection is requested, so a bad call
//! never reaches the network. Errors leave the dispatcher either in one of
//! the caller-facing categories or wrapped once as [`Error::Internal`].

use std::sync::Arc;

use codingops_core::{ConnectionManager, Error, Result};
use codingops_git::GitInspector;
use codingops_pipeline::ToolResponse;
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::Args;
use crate::handlers::{self, ToolParams};
use crate::tools::ToolName;

pub struct RequestDispatcher {
    connections: Arc<ConnectionManager>,
    git: GitInspector,
}

impl RequestDispatcher {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self::with_git(connections, GitInspector::new())
    }

    pub fn with_git(connections: Arc<ConnectionManager>, git: GitInspector) -> Self {
        Self { connections, git }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// Execute the tool `name` with `arguments`.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> Result<ToolResponse> {
        self.route(name, arguments).await.map_err(|e| {
            warn!(tool = name, kind = e.kind(), error = %e, "Tool call failed");
            normalize(e)
        })
    }

    async fn route(&self, name: &str, arguments: Option<Value>) -> Result<ToolResponse> {
        let tool: ToolName = name.parse()?;
        let args = Args::from_value(arguments)?;
        let params = ToolParams::parse(tool, &args)?;

        let connection = self.connections.instance()?;
        debug!(tool = %tool, "Dispatching tool call");
        handlers::execute(&connection, &self.git, params).await
    }
}

fn normalize(error: Error) -> Error {
    if error.is_classified() || matches!(error, Error::Internal(_)) {
        error
    } else {
        Error::Internal(error.to_string())
    }
}
