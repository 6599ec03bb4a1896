//! Lanyard push socket.
//!
//! Handles hello/initialize, heartbeats, and a fixed-delay reconnect after
//! abnormal closes. A normal close (1000) from either side ends the task.

mod connection;
mod handler;
mod types;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use types::{SocketConfig, SocketEvent, CLOSE_ABNORMAL, CLOSE_NORMAL, CLOSE_NO_STATUS};

use connection::connection_loop;

/// Handle to a running socket task.
pub struct LiveSocket {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl LiveSocket {
    /// Spawn the connection task. Cancelling `cancel` (or calling `close`)
    /// sends a normal close and ends it.
    pub fn connect(
        config: SocketConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::Receiver<SocketEvent>) {
        let (event_tx, event_rx) = mpsc::channel(64);
        let handle = tokio::spawn(connection_loop(config, event_tx, cancel.clone()));
        (Self { cancel, handle }, event_rx)
    }

    /// Close with code 1000 and wait for the task to finish.
    pub async fn close(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
