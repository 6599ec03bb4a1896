//! Concurrent one-shot fetch of several users.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, warn};

use super::client::PresenceApi;
use crate::error::PresenceError;
use crate::model::{PresenceSnapshot, SnapshotSource};

/// Fetch every id concurrently. A failed id maps to `None` and never
/// affects the others.
pub async fn fetch_many<A>(
    api: &A,
    user_ids: &[String],
    timeout: Duration,
) -> BTreeMap<String, Option<PresenceSnapshot>>
where
    A: PresenceApi + ?Sized,
{
    let fetches = user_ids.iter().map(|user_id| async move {
        let issued_at = Utc::now();
        let result = match tokio::time::timeout(timeout, api.fetch_user(user_id)).await {
            Ok(result) => result,
            Err(_) => Err(PresenceError::Timeout(timeout.as_millis() as u64)),
        };
        let snapshot = result.and_then(|data| {
            PresenceSnapshot::from_lanyard(user_id, data, SnapshotSource::Rest, issued_at)
        });

        match snapshot {
            Ok(snapshot) => {
                debug!(user_id = %user_id, status = ?snapshot.status, "Batch fetch ok");
                (user_id.clone(), Some(snapshot))
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Batch fetch failed");
                (user_id.clone(), None)
            }
        }
    });

    join_all(fetches).await.into_iter().collect()
}
