//! Notification Queue Module
//!
//! Ephemeral user-facing messages. Each notification schedules its own
//! removal after its duration elapses; explicit dismissal and timer expiry
//! race safely because removal is idempotent by id.

pub mod handlers;

pub use handlers::routes;

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Visual intent of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Positive outcome (item added, order confirmed)
    Success,
    /// Failure the user should act on (payment declined)
    Error,
    /// Neutral message
    Info,
}

/// One queued message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Time-based identifier, unique within the process
    pub id: u64,

    /// Text shown to the user
    pub message: String,

    /// Visual intent
    pub severity: Severity,

    /// Lifetime before self-removal, in milliseconds
    pub duration_ms: u64,
}

/// Per-session notification queues.
///
/// Queues keep insertion order for display. `push` spawns a tokio task that
/// dismisses the notification when its lifetime elapses; a timer firing
/// after an explicit dismissal finds nothing to remove and does nothing.
#[derive(Default)]
pub struct NotificationHub {
    queues: Arc<DashMap<String, Vec<Notification>>>,
    sequence: AtomicU64,
}

impl NotificationHub {
    /// Appends a notification and schedules its expiry. Returns the id.
    pub fn push(
        &self,
        session_id: &str,
        message: impl Into<String>,
        severity: Severity,
        duration_ms: u64,
    ) -> u64 {
        let id = self.next_id();
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            duration_ms,
        };

        self.queues
            .entry(session_id.to_owned())
            .or_default()
            .push(notification);

        let queues = Arc::clone(&self.queues);
        let session_id = session_id.to_owned();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            remove(&queues, &session_id, id);
        });

        id
    }

    /// Removes a notification by id. Idempotent: dismissing an absent id is
    /// a no-op, so user dismissal and timer expiry cannot conflict.
    pub fn dismiss(&self, session_id: &str, id: u64) {
        remove(&self.queues, session_id, id);
    }

    /// Current queue for a session, in insertion order.
    #[must_use]
    pub fn list(&self, session_id: &str) -> Vec<Notification> {
        self.queues
            .get(session_id)
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Time-based id: unix millis in the high bits, a process-wide sequence
    /// in the low 16 so same-millisecond pushes stay distinct.
    fn next_id(&self) -> u64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
        (millis << 16) | seq
    }
}

fn remove(queues: &DashMap<String, Vec<Notification>>, session_id: &str, id: u64) {
    if let Some(mut queue) = queues.get_mut(session_id) {
        queue.retain(|n| n.id != id);
    }
}
