//! Incoming frame classification.

use std::time::Duration;

use tracing::debug;

use crate::protocol::{events, opcodes, HelloPayload, LanyardData, SocketFrame};

/// What the connection loop should do with one text frame.
#[derive(Debug)]
pub(crate) enum FrameAction {
    Hello(Duration),
    Presence {
        data: Box<LanyardData>,
        event: String,
    },
    Ignore,
}

/// Classify a text frame. Malformed frames and frames about other users
/// are ignored.
pub(crate) fn handle_frame(text: &str, user_id: &str) -> FrameAction {
    let frame: SocketFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, "Unparseable socket frame");
            return FrameAction::Ignore;
        }
    };

    match frame.op {
        opcodes::HELLO => {
            let Some(d) = frame.d else {
                debug!("Hello frame without payload");
                return FrameAction::Ignore;
            };
            match serde_json::from_value::<HelloPayload>(d) {
                Ok(hello) if hello.heartbeat_interval > 0 => {
                    FrameAction::Hello(Duration::from_millis(hello.heartbeat_interval))
                }
                Ok(_) => {
                    debug!("Hello frame with zero heartbeat interval");
                    FrameAction::Ignore
                }
                Err(e) => {
                    debug!(error = %e, "Malformed hello payload");
                    FrameAction::Ignore
                }
            }
        }
        opcodes::EVENT => {
            let event = frame.t.unwrap_or_default();
            if event != events::INIT_STATE && event != events::PRESENCE_UPDATE {
                debug!(event = %event, "Ignoring socket event");
                return FrameAction::Ignore;
            }
            let Some(d) = frame.d else {
                debug!(event = %event, "Event frame without payload");
                return FrameAction::Ignore;
            };
            let data: LanyardData = match serde_json::from_value(d) {
                Ok(data) => data,
                Err(e) => {
                    debug!(event = %event, error = %e, "Malformed presence payload");
                    return FrameAction::Ignore;
                }
            };

            let for_tracked_user = data
                .discord_user
                .as_ref()
                .is_some_and(|user| user.id == user_id);
            if !for_tracked_user {
                debug!(event = %event, "Presence frame for another user");
                return FrameAction::Ignore;
            }

            FrameAction::Presence {
                data: Box::new(data),
                event,
            }
        }
        op => {
            debug!(op, "Ignoring socket opcode");
            FrameAction::Ignore
        }
    }
}
