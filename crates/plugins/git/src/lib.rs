//! Local git repository inspection for codingops.
//!
//! Reads the current branch and the `origin` remote of a working copy and
//! parses CODING remote URLs into `team/project/repository` paths. Every
//! lookup runs an ordered list of git commands and uses the first one that
//! produces a usable answer.

mod inspector;
mod remote;
mod runner;

pub use inspector::{GitInspector, GitState};
pub use remote::{parse_remote_url, RemoteRepository};
pub use runner::{GitRunner, ProcessRunner};
