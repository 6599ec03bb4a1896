//! Background WebSocket connection loop with fixed-delay reconnect.

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handler::{handle_frame, FrameAction};
use super::types::{SocketConfig, SocketEvent, CLOSE_ABNORMAL, CLOSE_NORMAL, CLOSE_NO_STATUS};
use crate::protocol::SocketFrame;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How one connected session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Cancelled locally; a normal close was sent.
    Teardown,
    /// The server closed with 1000.
    ServerClosed,
    Abnormal { code: u16, reason: String },
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task owning the socket. Ends on cancellation, on a normal
/// close, or when the event receiver is dropped.
pub(crate) async fn connection_loop(
    config: SocketConfig,
    event_tx: mpsc::Sender<SocketEvent>,
    cancel: CancellationToken,
) {
    if !config.initial_delay.is_zero() {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(config.initial_delay) => {}
        }
    }

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        info!(url = %config.url, attempt, "Connecting to Lanyard socket");
        if event_tx
            .send(SocketEvent::Connecting { attempt })
            .await
            .is_err()
        {
            return;
        }

        let connect = tokio::time::timeout(
            config.connect_timeout,
            tokio_tungstenite::connect_async(config.url.as_str()),
        );
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = connect => outcome,
        };

        let end = match outcome {
            Ok(Ok((ws_stream, _))) => run_session(ws_stream, &config, &event_tx, &cancel).await,
            Ok(Err(e)) => SessionEnd::Abnormal {
                code: CLOSE_ABNORMAL,
                reason: format!("connection failed: {e}"),
            },
            Err(_elapsed) => SessionEnd::Abnormal {
                code: CLOSE_ABNORMAL,
                reason: format!(
                    "connection timed out after {}s",
                    config.connect_timeout.as_secs()
                ),
            },
        };

        match end {
            SessionEnd::Teardown => {
                info!("Lanyard socket closed locally");
                let _ = event_tx.send(SocketEvent::Closed { code: CLOSE_NORMAL }).await;
                return;
            }
            SessionEnd::ServerClosed => {
                info!("Lanyard socket closed normally by server");
                let _ = event_tx.send(SocketEvent::Closed { code: CLOSE_NORMAL }).await;
                return;
            }
            SessionEnd::Abnormal { code, reason } => {
                warn!(
                    code,
                    reason = %reason,
                    delay_ms = config.reconnect_delay.as_millis() as u64,
                    "Lanyard socket lost, reconnecting"
                );
                let disconnected = SocketEvent::Disconnected {
                    code,
                    reason,
                    reconnect_in: config.reconnect_delay,
                };
                if event_tx.send(disconnected).await.is_err() {
                    return;
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = event_tx.send(SocketEvent::Closed { code: CLOSE_NORMAL }).await;
                return;
            }
            _ = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

async fn run_session(
    ws_stream: WsStream,
    config: &SocketConfig,
    event_tx: &mpsc::Sender<SocketEvent>,
    cancel: &CancellationToken,
) -> SessionEnd {
    let (mut write, mut read) = ws_stream.split();
    let mut heartbeat: Option<Interval> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: String::from("client shutdown").into(),
                };
                if let Err(e) = write.send(WsMessage::Close(Some(frame))).await {
                    debug!(error = %e, "Close frame not delivered");
                }
                return SessionEnd::Teardown;
            }
            _ = next_heartbeat(&mut heartbeat) => {
                if let Err(reason) = send_frame(&mut write, &SocketFrame::heartbeat()).await {
                    return SessionEnd::Abnormal { code: CLOSE_ABNORMAL, reason };
                }
                debug!("Heartbeat sent");
            }
            msg = read.next() => match msg {
                Some(Ok(WsMessage::Text(text))) => match handle_frame(&text, &config.user_id) {
                    FrameAction::Hello(interval) => {
                        let init = SocketFrame::initialize(&config.user_id);
                        if let Err(reason) = send_frame(&mut write, &init).await {
                            return SessionEnd::Abnormal { code: CLOSE_ABNORMAL, reason };
                        }
                        // First heartbeat one full interval after hello.
                        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        heartbeat = Some(ticker);

                        info!(
                            user_id = %config.user_id,
                            heartbeat_ms = interval.as_millis() as u64,
                            "Subscribed to Lanyard presence"
                        );
                        let subscribed = SocketEvent::Subscribed { heartbeat_interval: interval };
                        if event_tx.send(subscribed).await.is_err() {
                            return SessionEnd::Teardown;
                        }
                    }
                    FrameAction::Presence { data, event } => {
                        debug!(event = %event, "Presence frame");
                        let presence = SocketEvent::Presence {
                            data,
                            event,
                            received: Instant::now(),
                            received_at: Utc::now(),
                        };
                        if event_tx.send(presence).await.is_err() {
                            return SessionEnd::Teardown;
                        }
                    }
                    FrameAction::Ignore => {}
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(frame) => (u16::from(frame.code), frame.reason.to_string()),
                        None => (CLOSE_NO_STATUS, String::new()),
                    };
                    if code == CLOSE_NORMAL {
                        return SessionEnd::ServerClosed;
                    }
                    return SessionEnd::Abnormal { code, reason };
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return SessionEnd::Abnormal { code: CLOSE_ABNORMAL, reason: e.to_string() };
                }
                None => {
                    return SessionEnd::Abnormal {
                        code: CLOSE_ABNORMAL,
                        reason: "stream ended without close frame".to_string(),
                    };
                }
            },
        }
    }
}

/// Resolves on the next heartbeat tick; never resolves before hello.
async fn next_heartbeat(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn send_frame<S>(write: &mut S, frame: &SocketFrame) -> Result<(), String>
where
    S: futures_util::Sink<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(frame).map_err(|e| e.to_string())?;
    write
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| format!("send failed: {e}"))
}
