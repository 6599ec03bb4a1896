//! Feeds socket events into the shared view.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::shared::SyncCore;
use crate::model::{ConnectionState, PresenceSnapshot, SnapshotSource};
use crate::socket::SocketEvent;

pub(crate) async fn live_bridge(core: Arc<SyncCore>, mut events: mpsc::Receiver<SocketEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            SocketEvent::Connecting { attempt } => {
                debug!(attempt, "Socket connecting");
                core.begin_reconnect();
            }
            SocketEvent::Subscribed { heartbeat_interval } => {
                debug!(
                    heartbeat_ms = heartbeat_interval.as_millis() as u64,
                    "Socket subscribed"
                );
                core.set_connection(ConnectionState::Connected);
            }
            SocketEvent::Presence {
                data,
                event,
                received,
                received_at,
            } => {
                match PresenceSnapshot::from_lanyard(
                    &core.user_id,
                    *data,
                    SnapshotSource::Socket,
                    received_at,
                ) {
                    Ok(snapshot) => {
                        debug!(event = %event, status = ?snapshot.status, "Live presence");
                        core.apply_snapshot(snapshot, received, false);
                    }
                    Err(e) => warn!(event = %event, error = %e, "Dropping invalid live presence"),
                }
            }
            SocketEvent::Disconnected {
                code,
                reason,
                reconnect_in,
            } => {
                info!(
                    code,
                    reason = %reason,
                    reconnect_in_ms = reconnect_in.as_millis() as u64,
                    "Live presence disconnected"
                );
                core.set_connection(ConnectionState::Disconnected);
            }
            SocketEvent::Closed { code } => {
                info!(code, "Live presence closed");
                core.set_connection(ConnectionState::Disconnected);
            }
        }
    }
}
