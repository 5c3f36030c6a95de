//! Transient notifications.
//!
//! Toasts are shown above the page and, unless they are sticky, dismissed
//! automatically once their duration has elapsed. The host calls
//! [`ToastCenter::expire`] from its tick and renders [`ToastCenter::visible`].

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// How long a success toast stays on screen.
pub const SUCCESS_TOAST_DURATION: Duration = Duration::seconds(6);

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    /// `None` keeps the toast until newer toasts push it out.
    pub auto_dismiss: Option<Duration>,
}

impl Toast {
    /// A success toast that disappears after [`SUCCESS_TOAST_DURATION`].
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            auto_dismiss: Some(SUCCESS_TOAST_DURATION),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
            auto_dismiss: Some(SUCCESS_TOAST_DURATION),
        }
    }

    /// An error toast that never expires.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            auto_dismiss: None,
        }
    }
}

#[derive(Debug, Clone)]
struct ShownToast {
    toast: Toast,
    shown_at: DateTime<Utc>,
}

impl ShownToast {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.toast
            .auto_dismiss
            .is_some_and(|duration| now - self.shown_at >= duration)
    }
}

/// Queue of toasts currently on screen.
#[derive(Debug)]
pub struct ToastCenter {
    toasts: VecDeque<ShownToast>,
    max_visible: usize,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastCenter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 3,
        }
    }

    /// Shows a toast. The oldest toasts are dropped once more than three
    /// are on screen.
    pub fn show(&mut self, toast: Toast, now: DateTime<Utc>) {
        self.toasts.push_back(ShownToast {
            toast,
            shown_at: now,
        });
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    /// Removes every toast whose duration has elapsed at `now`.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|shown| !shown.is_expired(now));
    }

    /// Toasts on screen, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().map(|shown| &shown.toast)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
