//! Short-lived messages shown in the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const MAX_QUEUED: usize = 8;

/// How a message reads in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Prefix shown before the message text.
    pub fn marker(self) -> &'static str {
        match self {
            ToastKind::Info => "",
            ToastKind::Success => "\u{2714} ",
            ToastKind::Error => "error: ",
        }
    }
}

struct Toast {
    kind: ToastKind,
    text: String,
    shown_at: Option<Instant>,
}

/// FIFO of messages. Each one is visible for `TOAST_LIFETIME` once it
/// reaches the front.
#[derive(Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, text: impl Into<String>) {
        self.push_kind(ToastKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push_kind(ToastKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_kind(ToastKind::Error, text);
    }

    fn push_kind(&mut self, kind: ToastKind, text: impl Into<String>) {
        if self.queue.len() >= MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast { kind, text: text.into(), shown_at: None });
    }

    /// The message to show at `now`, expiring the front one as needed.
    pub fn current(&mut self, now: Instant) -> Option<(ToastKind, &str)> {
        while let Some(front) = self.queue.front_mut() {
            match front.shown_at {
                None => front.shown_at = Some(now),
                Some(t) if now.duration_since(t) >= TOAST_LIFETIME => {
                    self.queue.pop_front();
                    continue;
                }
                Some(_) => {}
            }
            break;
        }
        self.queue.front().map(|t| (t.kind, t.text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_shown_in_order() {
        let mut toasts = Toasts::default();
        let t0 = Instant::now();
        assert_eq!(toasts.current(t0), None);
        toasts.push("copied verse 3");
        toasts.push("bookmark added");
        assert_eq!(toasts.current(t0), Some((ToastKind::Info, "copied verse 3")));
        assert_eq!(toasts.current(t0 + Duration::from_secs(1)), Some((ToastKind::Info, "copied verse 3")));
        assert_eq!(toasts.current(t0 + TOAST_LIFETIME), Some((ToastKind::Info, "bookmark added")));
        assert_eq!(toasts.current(t0 + TOAST_LIFETIME * 2), None);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut toasts = Toasts::default();
        for i in 0..20 {
            toasts.push(format!("message {}", i));
        }
        assert_eq!(toasts.current(Instant::now()), Some((ToastKind::Info, "message 12")));
    }

    #[test]
    fn test_kinds_travel_with_messages() {
        let mut toasts = Toasts::default();
        let t0 = Instant::now();
        toasts.error("could not save preferences");
        toasts.success("bookmarked Al-Kahf");
        assert_eq!(toasts.current(t0), Some((ToastKind::Error, "could not save preferences")));
        assert_eq!(toasts.current(t0 + TOAST_LIFETIME), Some((ToastKind::Success, "bookmarked Al-Kahf")));
        assert_eq!(ToastKind::Error.marker(), "error: ");
        assert_eq!(ToastKind::Info.marker(), "");
    }
}
