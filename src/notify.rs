//! User-facing notifications: status events published by the session.
//!
//! The core never renders anything. It publishes [`NotificationEvent`]s
//! on an unbounded channel; whoever holds the receiver decides how and
//! for how long to show them. A loading notification is later updated
//! in place (success or error) or dismissed, addressed by its
//! [`NotificationId`].

use tokio::sync::mpsc;

use crate::session::SessionError;

/// Identifies one notification across post/update/dismiss events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    /// Human-readable text.
    pub message: String,
    /// Classified cause, present for `Error` notifications.
    pub error: Option<SessionError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A new notification.
    Posted(Notification),
    /// An existing notification changed kind and text.
    Updated(Notification),
    /// An existing notification should disappear.
    Dismissed(NotificationId),
}

/// Publishing side of the notification channel.
///
/// Sends never fail from the caller's point of view: a dropped
/// receiver just means nobody is watching.
#[derive(Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<NotificationEvent>,
    next_id: u64,
}

impl Notifier {
    /// Create a notifier and the receiver a renderer consumes.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_id: 1 }, rx)
    }

    /// Post an in-progress notification.
    pub fn loading(&mut self, message: &str) -> NotificationId {
        self.post(NotificationKind::Loading, message.to_string(), None)
    }

    pub fn success(&mut self, message: &str) -> NotificationId {
        self.post(NotificationKind::Success, message.to_string(), None)
    }

    /// Post an error; the message is the error's display text.
    pub fn error(&mut self, error: SessionError) -> NotificationId {
        self.post(NotificationKind::Error, error.to_string(), Some(error))
    }

    /// Turn an existing notification into a success.
    pub fn update_success(&self, id: NotificationId, message: &str) {
        self.send(NotificationEvent::Updated(Notification {
            id,
            kind: NotificationKind::Success,
            message: message.to_string(),
            error: None,
        }));
    }

    /// Turn an existing notification into an error.
    pub fn update_error(&self, id: NotificationId, error: SessionError) {
        self.send(NotificationEvent::Updated(Notification {
            id,
            kind: NotificationKind::Error,
            message: error.to_string(),
            error: Some(error),
        }));
    }

    pub fn dismiss(&self, id: NotificationId) {
        self.send(NotificationEvent::Dismissed(id));
    }

    fn post(
        &mut self,
        kind: NotificationKind,
        message: String,
        error: Option<SessionError>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.send(NotificationEvent::Posted(Notification {
            id,
            kind,
            message,
            error,
        }));
        id
    }

    fn send(&self, event: NotificationEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("notification receiver dropped");
        }
    }
}
