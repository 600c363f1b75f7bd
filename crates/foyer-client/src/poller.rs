use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use foyer_types::models::{ChatEntry, ContactMessage, FriendRequest};

use crate::client::{AdminToken, ApiClient};

/// Operator surface refresh interval.
pub const OPERATOR_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Chat transcript refresh interval. Shorter, since it carries the
/// conversation itself.
pub const CHAT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// One wholesale refresh of the operator's view. Collections are replaced,
/// never patched, so a stale poll can only lose to the next tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorSnapshot {
    pub requests: Vec<FriendRequest>,
    pub messages: Vec<ContactMessage>,
}

/// Owns a polling task. `stop` (or drop) aborts the loop deterministically;
/// an in-flight response is simply never observed.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Poll the operator collections: an immediate first fetch, then one every
/// `interval` until the handle is stopped or every receiver is dropped.
/// Transport failures are logged and retried on the next tick; the last
/// good snapshot stays current in the meantime.
pub fn spawn_operator_poll(
    client: ApiClient,
    token: AdminToken,
    interval: Duration,
) -> (watch::Receiver<OperatorSnapshot>, PollHandle) {
    let (tx, rx) = watch::channel(OperatorSnapshot::default());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            // Sequential round trips on purpose: the surface reflects one
            // completed fetch at a time.
            let requests = match client.list_requests(&token).await {
                Ok(requests) => requests,
                Err(e) => {
                    warn!("operator poll failed: {}", e);
                    continue;
                }
            };
            let messages = match client.list_messages(&token).await {
                Ok(messages) => messages,
                Err(e) => {
                    warn!("operator poll failed: {}", e);
                    continue;
                }
            };

            if tx.send(OperatorSnapshot { requests, messages }).is_err() {
                // Every receiver is gone; the surface unmounted.
                break;
            }
            debug!("operator snapshot refreshed");
        }
    });

    (rx, PollHandle { task })
}

/// Poll the shared chat transcript. Unconditional: no credential gates the
/// read, so the poll runs for visitors and operator alike.
pub fn spawn_chat_poll(
    client: ApiClient,
    interval: Duration,
) -> (watch::Receiver<Vec<ChatEntry>>, PollHandle) {
    let (tx, rx) = watch::channel(Vec::new());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            let entries = match client.list_chat().await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("chat poll failed: {}", e);
                    continue;
                }
            };

            if tx.send(entries).is_err() {
                break;
            }
            debug!("chat transcript refreshed");
        }
    });

    (rx, PollHandle { task })
}
