//! Response shaping for codingops tools.
//!
//! Tool handlers return a [`ToolResponse`]: ordered text and table blocks
//! plus optional structured metadata. The [`format`] builders produce one
//! for every domain result; [`markdown`] renders tables and timestamps.

pub mod format;
pub mod markdown;
pub mod response;
pub mod truncation;

pub use response::{ContentBlock, ToolResponse};
pub use truncation::truncate_string;
