//! Run coordinator: applies every source either one after another or all at once.
//!
//! Sequential mode stops at the first failing source. Parallel mode starts one
//! task per source, never cancels siblings, and reports every failure together.
//! Already-applied statements are never rolled back in either mode.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;

use crate::error::{AggregateFailure, AggregateResult, ScriptError, SourceFailure};
use crate::fetch::Fetcher;
use crate::runner::{self, ExecutionOutcome};
use crate::script::ScriptSource;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Sequential,
    Parallel,
}

impl RunMode {
    pub fn from_flag(parallel: bool) -> Self {
        if parallel {
            RunMode::Parallel
        } else {
            RunMode::Sequential
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Sequential => "sequential",
            RunMode::Parallel => "parallel",
        }
    }
}

pub struct Coordinator<F: ?Sized, S: ?Sized> {
    fetcher: Arc<F>,
    session: Arc<S>,
}

impl<F, S> Coordinator<F, S>
where
    F: Fetcher + ?Sized + 'static,
    S: Session + ?Sized + 'static,
{
    pub fn new(fetcher: Arc<F>, session: Arc<S>) -> Self {
        Self { fetcher, session }
    }

    pub async fn run_all(&self, sources: &[ScriptSource], mode: RunMode) -> AggregateResult {
        tracing::info!(sources = sources.len(), mode = mode.as_str(), "applying scripts");
        match mode {
            RunMode::Sequential => self.run_sequential(sources).await,
            RunMode::Parallel => self.run_parallel(sources).await,
        }
    }

    async fn run_sequential(&self, sources: &[ScriptSource]) -> AggregateResult {
        for source in sources {
            let outcome = runner::run_script(&*self.fetcher, &*self.session, source.clone()).await;
            log_outcome(&outcome);
            if let Some(failure) = outcome.into_failure() {
                return Err(AggregateFailure { failures: vec![failure] });
            }
        }
        Ok(())
    }

    async fn run_parallel(&self, sources: &[ScriptSource]) -> AggregateResult {
        if sources.is_empty() {
            return Ok(());
        }

        // Every task sends exactly one outcome, so sends never wait on the receiver.
        let (tx, mut rx) = mpsc::channel::<ExecutionOutcome>(sources.len());
        let mut tasks = Vec::with_capacity(sources.len());
        for source in sources {
            let tx = tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let session = Arc::clone(&self.session);
            let source = source.clone();
            tasks.push(tokio::spawn(async move {
                let outcome = runner::run_script(&*fetcher, &*session, source).await;
                let _ = tx.send(outcome).await;
            }));
        }
        drop(tx);

        let joined = join_all(tasks).await;

        let mut failures = Vec::new();
        let mut collected = 0usize;
        while let Some(outcome) = rx.recv().await {
            collected += 1;
            log_outcome(&outcome);
            failures.extend(outcome.into_failure());
        }

        // A task that died before sending still owes its source an outcome.
        for (source, joined) in sources.iter().zip(joined) {
            if let Err(err) = joined {
                tracing::error!(source = %source, error = %err, "script task aborted");
                failures.push(SourceFailure {
                    locator: source.clone(),
                    error: ScriptError::Aborted(err.to_string()),
                });
                collected += 1;
            }
        }
        debug_assert_eq!(collected, sources.len());

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateFailure { failures })
        }
    }
}

fn log_outcome(outcome: &ExecutionOutcome) {
    match &outcome.result {
        Ok(statements) => {
            tracing::info!(source = %outcome.locator, statements, "script applied")
        }
        Err(err) => tracing::warn!(source = %outcome.locator, error = %err, "script failed"),
    }
}
