use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::anyhow;
use courier_db::Database;
use tracing::{debug, error};

use crate::auth::AppState;
use crate::error::ApiError;

/// Sets the flag when the owning request future is dropped.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Run a synchronous store call off the async runtime.
///
/// If the request is cancelled (the returned future is dropped) before the
/// closure gets to run, the store call is skipped entirely.
pub async fn run<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(cancelled.clone());

    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        if cancelled.load(Ordering::Acquire) {
            debug!("Request cancelled before store call");
            return Err(anyhow!("request cancelled"));
        }
        f(&state.db)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Store(e.into())
    })?
    .map_err(ApiError::Store)
}
