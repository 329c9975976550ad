//! Compensation stack for multi-step operations.
//!
//! Operations that touch several independently persisted aggregates push an
//! undo step after each side effect lands. If a later step fails, the stack is
//! unwound newest-first. Steps for effects the operation merely reused are
//! never pushed, so they are never undone.
//!
//! ```rust,ignore
//! let mut saga = Compensations::new();
//!
//! let facility = deps.facilities.create(input, actor).await?;
//! let facilities = deps.facilities.clone();
//! saga.push("delete created facility", move || async move {
//!     facilities.delete(facility.id).await
//! });
//!
//! if let Err(e) = deps.audit_log.record(entry).await {
//!     saga.compensate().await;
//!     return Err(e);
//! }
//! ```

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use tracing::{error, info};

type UndoFn<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<()>> + Send + 'a>;

struct Compensation<'a> {
    label: &'static str,
    undo: UndoFn<'a>,
}

/// Ordered list of undo steps, run in reverse on failure
#[derive(Default)]
pub struct Compensations<'a> {
    steps: Vec<Compensation<'a>>,
}

/// What happened while unwinding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompensationReport {
    pub succeeded: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

impl CompensationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<'a> Compensations<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register the undo for a side effect that just succeeded.
    pub fn push<F, Fut>(&mut self, label: &'static str, undo: F)
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<()>> + Send + 'a,
    {
        self.steps.push(Compensation {
            label,
            undo: Box::new(move || undo().boxed()),
        });
    }

    /// Run every registered undo, newest first.
    ///
    /// A failing step is logged and does not stop the remaining ones.
    pub async fn compensate(self) -> CompensationReport {
        let mut report = CompensationReport::default();

        for step in self.steps.into_iter().rev() {
            match (step.undo)().await {
                Ok(()) => {
                    info!(step = step.label, "Compensation step applied");
                    report.succeeded.push(step.label);
                }
                Err(e) => {
                    error!(step = step.label, error = %e, "Compensation step failed");
                    report.failed.push(step.label);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn steps_run_newest_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut saga = Compensations::new();

        for label in ["first", "second", "third"] {
            let order = order.clone();
            saga.push(label, move || async move {
                order.lock().unwrap().push(label);
                Ok(())
            });
        }

        let report = saga.compensate().await;

        assert_eq!(*order.lock().unwrap(), vec!["third", "second", "first"]);
        assert_eq!(report.succeeded, vec!["third", "second", "first"]);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn failing_step_does_not_stop_the_rest() {
        let ran = Arc::new(Mutex::new(Vec::new()));
        let mut saga = Compensations::new();

        let first = ran.clone();
        saga.push("restore row", move || async move {
            first.lock().unwrap().push("restore row");
            Ok(())
        });
        saga.push("delete child", || async {
            Err(anyhow::anyhow!("store unavailable"))
        });

        let report = saga.compensate().await;

        assert_eq!(*ran.lock().unwrap(), vec!["restore row"]);
        assert_eq!(report.failed, vec!["delete child"]);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn empty_saga_reports_nothing() {
        let saga = Compensations::new();
        assert_eq!(saga.compensate().await, CompensationReport::default());
    }
}
