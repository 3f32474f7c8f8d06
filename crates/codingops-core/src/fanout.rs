//! Sequential fan-out with per-item failure capture.
//!
//! Items are processed strictly one after another in input order. A failing
//! item is recorded and the loop moves on; nothing short-circuits.

use std::future::Future;

use tracing::warn;

use crate::error::Error;

/// Result of one item of a fan-out.
#[derive(Debug)]
pub enum Outcome<I, T> {
    Succeeded { item: I, value: T },
    Failed { item: I, error: Error },
}

impl<I, T> Outcome<I, T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

/// Run `op` for every item in order and collect one outcome per item.
pub async fn run_sequential<I, T, F, Fut>(items: Vec<I>, mut op: F) -> Vec<Outcome<I, T>>
where
    F: FnMut(&I) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut outcomes = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        match op(&item).await {
            Ok(value) => outcomes.push(Outcome::Succeeded { item, value }),
            Err(error) => {
                warn!(index, error = %error, "Fan-out item failed");
                outcomes.push(Outcome::Failed { item, error });
            }
        }
    }

    outcomes
}

/// Split outcomes into successes and failures, keeping input order in each.
pub fn partition<I, T, S, E>(
    outcomes: Vec<Outcome<I, T>>,
    mut on_success: impl FnMut(I, T) -> S,
    mut on_failure: impl FnMut(I, Error) -> E,
) -> (Vec<S>, Vec<E>) {
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome {
            Outcome::Succeeded { item, value } => succeeded.push(on_success(item, value)),
            Outcome::Failed { item, error } => failed.push(on_failure(item, error)),
        }
    }

    (succeeded, failed)
}
