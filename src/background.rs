use std::future::Future;

use tokio::task::JoinHandle;

/// Fire-and-forget task runner. A panic inside the task is caught and logged
/// instead of tearing anything else down; the caller gets a handle it can
/// await in tests but is free to drop.
pub fn spawn_logged<F>(label: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = tokio::spawn(fut).await {
            if err.is_panic() {
                tracing::error!("Background task {label} panicked: {err}");
            }
        }
    })
}
