//! Error taxonomy shared by the fetch, execute and coordination layers.

use std::fmt;

use thiserror::Error;

use crate::script::ScriptSource;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a whole run: success, or every collected source failure.
pub type AggregateResult = Result<(), AggregateFailure>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {locator} failed: {cause}")]
    Request {
        locator: ScriptSource,
        #[source]
        cause: reqwest::Error,
    },
    #[error("{locator} responded with {status}")]
    Status {
        locator: ScriptSource,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {locator}: {cause}")]
    Io {
        locator: ScriptSource,
        #[source]
        cause: std::io::Error,
    },
}

/// A statement rejected by the session. Displays as the session's own message.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct ExecError {
    pub statement: String,
    #[source]
    pub cause: BoxError,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("script task aborted: {0}")]
    Aborted(String),
}

/// One failing source and the error that stopped it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SourceFailure {
    pub locator: ScriptSource,
    pub error: ScriptError,
}

#[derive(Debug)]
pub struct AggregateFailure {
    pub failures: Vec<SourceFailure>,
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_failure(locator: &str, message: &str) -> SourceFailure {
        SourceFailure {
            locator: locator.into(),
            error: ExecError { statement: "SELECT 1".into(), cause: message.into() }.into(),
        }
    }

    #[test]
    fn exec_error_displays_only_the_cause() {
        let err = ExecError { statement: "CREATE TABL x".into(), cause: "syntax error".into() };
        assert_eq!(err.to_string(), "syntax error");
    }

    #[test]
    fn aggregate_joins_messages_with_newlines() {
        let agg = AggregateFailure {
            failures: vec![exec_failure("a", "timeout"), exec_failure("c", "unauthorized")],
        };
        assert_eq!(agg.to_string(), "timeout\nunauthorized");
    }

    #[test]
    fn single_failure_aggregate_is_the_bare_message() {
        let agg = AggregateFailure { failures: vec![exec_failure("b", "syntax error")] };
        assert_eq!(agg.to_string(), "syntax error");
    }

    #[test]
    fn fetch_error_names_its_locator() {
        let err = FetchError::Io {
            locator: "/tmp/missing.cql".into(),
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/missing.cql: no such file");
    }
}
