//! Background REST polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::shared::SyncCore;

/// Re-fetch every `every` until the root token is cancelled. Failed polls
/// do not stop later ones.
pub(crate) async fn poll_loop(core: Arc<SyncCore>, every: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = core.root.cancelled() => break,
            _ = ticker.tick() => {
                let state = core.fetch().await;
                debug!(
                    connection = ?state.connection,
                    fallback = state.is_fallback(),
                    "Poll complete"
                );
            }
        }
    }

    debug!("Poll loop stopped");
}
