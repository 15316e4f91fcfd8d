use std::collections::VecDeque;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: OffsetDateTime,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    fn notify_success(&mut self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn notify_error(&mut self, message: &str) {
        self.notify(Notification::error(message));
    }
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Prints notifications for the non-interactive commands.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        if notification.is_error() {
            eprintln!("error: {}", notification.message);
        } else {
            println!("{}", notification.message);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    shown_at: Instant,
}

/// Timed toasts for the dashboard, oldest first.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    display_for: Duration,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(display_for: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            display_for,
            capacity: 4,
        }
    }

    pub fn push_at(&mut self, notification: Notification, now: Instant) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            notification,
            shown_at: now,
        });
    }

    /// Drops toasts whose display window has elapsed. Returns how many went.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let display_for = self.display_for;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < display_for);
        before - self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(3_000))
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_display_window() {
        let mut queue = ToastQueue::new(Duration::from_millis(3_000));
        let start = Instant::now();
        queue.push_at(Notification::success("first"), start);
        queue.push_at(
            Notification::error("second"),
            start + Duration::from_millis(2_000),
        );

        assert_eq!(queue.expire(start + Duration::from_millis(2_999)), 0);
        assert_eq!(queue.expire(start + Duration::from_millis(3_000)), 1);
        let remaining: Vec<_> = queue.iter().map(|t| t.notification.message.as_str()).collect();
        assert_eq!(remaining, vec!["second"]);
        assert_eq!(queue.expire(start + Duration::from_millis(5_000)), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut queue = ToastQueue::default();
        let now = Instant::now();
        for idx in 0..6 {
            queue.push_at(Notification::success(format!("toast {idx}")), now);
        }
        assert_eq!(queue.len(), 4);
        assert_eq!(
            queue.iter().next().map(|t| t.notification.message.clone()),
            Some("toast 2".to_string())
        );
    }

    #[test]
    fn vec_notifier_records_levels() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.notify_success("ok");
        sink.notify_error("bad");
        assert_eq!(sink.len(), 2);
        assert!(!sink[0].is_error());
        assert!(sink[1].is_error());
    }
}
