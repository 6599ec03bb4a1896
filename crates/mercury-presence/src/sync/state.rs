//! Connection state transitions on the consumer view.

use tracing::{debug, warn};

use super::types::PresenceState;
use crate::model::ConnectionState;

/// Move the view's connection toward `next`, returning every edge taken.
///
/// Re-asserting the current state takes no edge. `Disconnected → Connected`
/// is walked through `Connecting`; any other invalid request is rejected.
pub(crate) fn advance(
    state: &mut PresenceState,
    next: ConnectionState,
) -> Vec<(ConnectionState, ConnectionState)> {
    let current = state.connection;
    if current == next {
        return Vec::new();
    }

    let path = if current.can_transition_to(next) {
        vec![next]
    } else if current == ConnectionState::Disconnected && next == ConnectionState::Connected {
        vec![ConnectionState::Connecting, ConnectionState::Connected]
    } else {
        warn!(from = ?current, to = ?next, "Rejected connection transition");
        return Vec::new();
    };

    let mut taken = Vec::with_capacity(path.len());
    for step in path {
        debug!(from = ?state.connection, to = ?step, "Connection transition");
        taken.push((state.connection, step));
        state.connection = step;
    }
    taken
}
