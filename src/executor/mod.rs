//! Statement executor.

use crate::error::ExecError;
use crate::session::Session;

/// Run one statement against the shared session. Errors are never retried.
pub async fn execute<S>(session: &S, statement: &str) -> Result<(), ExecError>
where
    S: Session + ?Sized,
{
    tracing::info!("Running command: {}", statement);
    session
        .execute(statement)
        .await
        .map_err(|cause| ExecError { statement: statement.to_string(), cause })
}
