//! Bridge from async activities to synchronous collaborators.
//!
//! Activities are async so they never stall the engine's cooperative
//! scheduler, but the persistence API they call is synchronous. `run_blocking`
//! moves such work onto tokio's blocking pool.

use crate::error::{ExportflowError, Result};

/// Run synchronous work on the blocking thread pool and await its result.
///
/// The closure runs inside the caller's tracing span. Errors it returns are
/// passed through unchanged; a panic inside it surfaces as an
/// [`ExportflowError::Engine`] failure and a cancelled job as
/// [`ExportflowError::Cancelled`].
pub async fn run_blocking<F, T>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        work()
    })
    .await
    .map_err(|e| {
        if e.is_cancelled() {
            ExportflowError::Cancelled("blocking job was cancelled".to_string())
        } else {
            ExportflowError::Engine(format!("blocking job panicked: {e}"))
        }
    })?
}
