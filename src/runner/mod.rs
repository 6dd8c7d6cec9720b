//! Script runner: one source, fetched once, statements strictly in order.

use crate::error::{ScriptError, SourceFailure};
use crate::executor;
use crate::fetch::Fetcher;
use crate::script::ScriptSource;
use crate::session::Session;

/// Result of running one source. On success carries the number of executed statements.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub locator: ScriptSource,
    pub result: Result<usize, ScriptError>,
}

impl ExecutionOutcome {
    pub fn into_failure(self) -> Option<SourceFailure> {
        match self.result {
            Ok(_) => None,
            Err(error) => Some(SourceFailure { locator: self.locator, error }),
        }
    }
}

pub async fn run_script<F, S>(fetcher: &F, session: &S, source: ScriptSource) -> ExecutionOutcome
where
    F: Fetcher + ?Sized,
    S: Session + ?Sized,
{
    let result = apply(fetcher, session, &source).await;
    ExecutionOutcome { locator: source, result }
}

async fn apply<F, S>(fetcher: &F, session: &S, source: &ScriptSource) -> Result<usize, ScriptError>
where
    F: Fetcher + ?Sized,
    S: Session + ?Sized,
{
    let script = fetcher.fetch(source).await?;
    if script.is_empty() {
        tracing::warn!(source = %source, "script has no statements");
    }

    for statement in script.statements() {
        executor::execute(session, statement).await?;
    }
    Ok(script.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MapFetcher, RecordingSession};

    #[tokio::test]
    async fn executes_every_statement_in_order() {
        let fetcher = MapFetcher::default().with("s1", "ONE;\n\n  TWO;\n   \nTHREE;\n");
        let session = RecordingSession::default();

        let outcome = run_script(&fetcher, &session, "s1".into()).await;

        assert_eq!(outcome.result.unwrap(), 3);
        assert_eq!(session.executed(), vec!["ONE;", "TWO;", "THREE;"]);
    }

    #[tokio::test]
    async fn stops_at_first_failing_statement() {
        let fetcher = MapFetcher::default().with("s1", "ONE;\nBAD;\nTHREE;");
        let session = RecordingSession::default().failing_on("BAD;", "syntax error");

        let outcome = run_script(&fetcher, &session, "s1".into()).await;

        assert_eq!(session.executed(), vec!["ONE;", "BAD;"]);
        let failure = outcome.into_failure().expect("should fail");
        assert_eq!(failure.locator.as_str(), "s1");
        assert!(matches!(failure.error, ScriptError::Exec(_)));
        assert_eq!(failure.to_string(), "syntax error");
    }

    #[tokio::test]
    async fn fetch_failure_executes_nothing() {
        let fetcher = MapFetcher::default();
        let session = RecordingSession::default();

        let outcome = run_script(&fetcher, &session, "missing".into()).await;

        assert!(matches!(outcome.result, Err(ScriptError::Fetch(_))));
        assert!(session.executed().is_empty());
        assert_eq!(fetcher.fetch_count("missing"), 1);
    }

    #[tokio::test]
    async fn empty_script_succeeds_without_executing() {
        let fetcher = MapFetcher::default().with("blank", " \n\t\n");
        let session = RecordingSession::default();

        let outcome = run_script(&fetcher, &session, "blank".into()).await;

        assert_eq!(outcome.result.unwrap(), 0);
        assert!(session.executed().is_empty());
    }
}
