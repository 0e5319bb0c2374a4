//! # Notifications
//!
//! The core only emits [`NotificationEvent`]s through a [`Notifier`]. Delivery
//! is a separate subsystem: [`ChannelNotifier`] pushes events into a bounded
//! `tokio::sync::mpsc` channel and never waits, and a dispatcher task drains
//! the channel into a per-principal [`NotificationInbox`].
//!
//! Emission is fire-and-forget. A full or closed channel drops the event,
//! bumps `medid_notifications_dropped_total`, and logs a warning. It never
//! fails the operation that emitted it.

use std::collections::HashMap;
use std::sync::Arc;

use medid_core::{NotificationId, PrincipalId, Timestamp};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Something a principal should be told about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub recipient: PrincipalId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

pub trait Notifier: Send + Sync {
    /// Hand off an event. Must not block and must not fail the caller.
    fn notify(&self, event: NotificationEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: NotificationEvent) {}
}

/// Bounded-channel [`Notifier`].
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<NotificationEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: NotificationEvent) {
        let recipient = event.recipient;
        if let Err(err) = self.sender.try_send(event) {
            metrics::counter!("medid_notifications_dropped_total").increment(1);
            warn!(recipient = %recipient, error = %err, "notification dropped");
        }
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub read: bool,
    pub created_at: Timestamp,
}

/// Per-principal notification storage.
#[derive(Debug, Clone, Default)]
pub struct NotificationInbox {
    entries: Arc<RwLock<HashMap<PrincipalId, Vec<Notification>>>>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&self, event: NotificationEvent) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            kind: event.kind,
            title: event.title,
            message: event.message,
            metadata: event.metadata,
            read: false,
            created_at: Timestamp::now(),
        };
        self.entries
            .write()
            .entry(event.recipient)
            .or_default()
            .push(notification.clone());
        notification
    }

    /// Notifications for `principal`, newest first.
    pub fn list(&self, principal: PrincipalId) -> Vec<Notification> {
        self.entries
            .read()
            .get(&principal)
            .map(|items| items.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub fn unread_count(&self, principal: PrincipalId) -> usize {
        self.entries
            .read()
            .get(&principal)
            .map_or(0, |items| items.iter().filter(|n| !n.read).count())
    }

    /// Mark one of `principal`'s notifications read. Another principal's
    /// notification id is reported as not found.
    pub fn mark_read(
        &self,
        principal: PrincipalId,
        id: NotificationId,
    ) -> Result<Notification, ServiceError> {
        let mut entries = self.entries.write();
        let item = entries
            .get_mut(&principal)
            .and_then(|items| items.iter_mut().find(|n| n.id == id))
            .ok_or_else(|| ServiceError::NotFound(format!("notification {id}")))?;
        item.read = true;
        Ok(item.clone())
    }

    /// Drain `events` into this inbox until every sender is gone.
    pub fn spawn_dispatcher(
        &self,
        mut events: mpsc::Receiver<NotificationEvent>,
    ) -> JoinHandle<()> {
        let inbox = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let recipient = event.recipient;
                let delivered = inbox.deliver(event);
                debug!(
                    recipient = %recipient,
                    notification_id = %delivered.id,
                    "notification delivered"
                );
            }
            debug!("notification channel closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(recipient: PrincipalId, title: &str) -> NotificationEvent {
        NotificationEvent {
            recipient,
            kind: NotificationKind::Info,
            title: title.into(),
            message: "m".into(),
            metadata: None,
        }
    }

    #[test]
    fn inbox_lists_newest_first_per_principal() {
        let inbox = NotificationInbox::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        inbox.deliver(event(alice, "first"));
        inbox.deliver(event(alice, "second"));
        inbox.deliver(event(bob, "other"));

        let titles: Vec<_> = inbox.list(alice).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(inbox.list(bob).len(), 1);
        assert!(inbox.list(PrincipalId::new()).is_empty());
    }

    #[test]
    fn mark_read_is_scoped_to_owner() {
        let inbox = NotificationInbox::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        let n = inbox.deliver(event(alice, "hi"));

        assert!(matches!(
            inbox.mark_read(bob, n.id),
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(inbox.unread_count(alice), 1);
        assert!(inbox.mark_read(alice, n.id).unwrap().read);
        assert_eq!(inbox.unread_count(alice), 0);
    }

    #[tokio::test]
    async fn channel_delivers_through_dispatcher() {
        let (notifier, rx) = ChannelNotifier::channel(8);
        let inbox = NotificationInbox::new();
        let handle = inbox.spawn_dispatcher(rx);
        let alice = PrincipalId::new();

        notifier.notify(event(alice, "hello"));
        drop(notifier);
        handle.await.unwrap();

        assert_eq!(inbox.list(alice)[0].title, "hello");
    }

    #[tokio::test]
    async fn full_channel_drops_without_blocking() {
        let (notifier, mut rx) = ChannelNotifier::channel(1);
        let alice = PrincipalId::new();
        notifier.notify(event(alice, "kept"));
        notifier.notify(event(alice, "dropped"));
        drop(notifier);

        assert_eq!(rx.recv().await.unwrap().title, "kept");
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(NotificationKind::Success).unwrap(), "success");
    }
}
