//! Tool response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::markdown::render_table;

/// One unit of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        ContentBlock::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Render as Markdown text.
    pub fn to_markdown(&self) -> String {
        match self {
            ContentBlock::Text { text } => text.clone(),
            ContentBlock::Table { headers, rows } => render_table(headers, rows),
        }
    }
}

/// Result of a successful tool call: ordered content blocks plus optional
/// structured metadata for machine consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_block(ContentBlock::text(text))
    }

    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.content.push(block);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// All blocks rendered as Markdown, separated by blank lines.
    pub fn to_markdown(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
