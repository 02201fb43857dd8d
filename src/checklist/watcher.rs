//! Reactive sync loop — re-derives a checklist whenever its task store changes.
//!
//! Runs one pass eagerly on start, then one pass per batch of task store
//! events. Events already queued when a pass starts are drained first, so a
//! burst of task updates costs a single pass.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::api::ChecklistApi;

/// Spawn the sync loop for `api`. Abort the handle to stop it.
pub fn spawn_sync_loop(api: Arc<ChecklistApi>) -> JoinHandle<()> {
    // Subscribe before the first pass so no change slips between the two.
    let mut rx = api.store().subscribe();

    tokio::spawn(async move {
        info!("Checklist sync loop started");
        run_pass(&api).await;

        loop {
            match rx.recv().await {
                Ok(event) => {
                    let mut batched = 1;
                    while rx.try_recv().is_ok() {
                        batched += 1;
                    }
                    debug!(task_id = %event.task_id(), batched, "Task store changed");
                    run_pass(&api).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "Checklist sync loop lagged behind task events; resyncing");
                    run_pass(&api).await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Task event channel closed");
                    break;
                }
            }
        }

        info!("Checklist sync loop stopped");
    })
}

async fn run_pass(api: &ChecklistApi) {
    if let Err(e) = api.sync().await {
        warn!(error = %e, "Checklist sync pass failed; will retry on next task change");
    }
}
