//! Local UI tasks.
//!
//! Listeners are synchronous, but some of them start navigation (a close
//! button pops a dialog, a tab click selects a pane). Those run as local tasks
//! on the current `LocalSet`; a failure is logged, since a listener has no one
//! to return an error to.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::error;

use crate::error::Result;

/// Spawn `fut` on the current `LocalSet`, logging its error if it fails.
///
/// `what` names the task in the log.
///
/// # Panics
///
/// Panics when called outside a `tokio::task::LocalSet`.
pub fn spawn<F>(what: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<()>> + 'static,
{
    tokio::task::spawn_local(async move {
        if let Err(err) = fut.await {
            error!(task = what, %err, "ui task failed");
        }
    })
}
