//! Short-lived notifications drawn in the top-right corner.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
    pub style: ToastStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Success,
    Error,
    Info,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Duration::from_secs(2), ToastStyle::Success)
    }

    /// Errors stay on screen longer.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Duration::from_secs(4), ToastStyle::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Duration::from_secs(2), ToastStyle::Info)
    }

    fn new(message: impl Into<String>, duration: Duration, style: ToastStyle) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration,
            style,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}
