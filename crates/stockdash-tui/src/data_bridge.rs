//! Data bridge: connects the [`Dashboard`] watch channels to TUI actions.
//!
//! Subscribes before starting the controller so the first `Fetching`
//! transition is observed, then forwards every change as an [`Action`]
//! until cancelled.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use stockdash_core::Dashboard;

use crate::action::Action;

pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut state = dashboard.state();
    let mut snapshot = dashboard.snapshot();
    let mut error = dashboard.error();
    let mut sleeping = dashboard.sleeping();

    // Initial fetch plus timer; runs alongside the forwarding loop below.
    let starter = dashboard.clone();
    tokio::spawn(async move {
        let outcome = starter.start().await;
        debug!(?outcome, "initial refresh finished");
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = state.changed() => {
                let s = *state.borrow_and_update();
                let _ = action_tx.send(Action::RefreshStateChanged(s));
            }
            Ok(()) = error.changed() => {
                let e = error.borrow_and_update().clone();
                let _ = action_tx.send(Action::ErrorChanged(e));
            }
            Ok(()) = snapshot.changed() => {
                let latest = snapshot.borrow_and_update().clone();
                if let Some(snap) = latest {
                    debug!(updated_at = %snap.updated_at, "dispatching SnapshotUpdated");
                    let _ = action_tx.send(Action::SnapshotUpdated(snap));
                }
            }
            Ok(()) = sleeping.changed() => {
                let flag = *sleeping.borrow_and_update();
                let _ = action_tx.send(Action::SleepingChanged(flag));
            }
        }
    }

    dashboard.shutdown().await;
    debug!("data bridge shut down");
}
