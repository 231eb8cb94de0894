//! Transient notices
//!
//! Success and error messages that dismiss themselves after a fixed delay.
//! Only one notice is visible at a time; showing a new one replaces it.

use std::time::Duration;
use tokio::time::Instant;

use crate::config::UiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.ttl
    }
}

/// Holder for the single visible notice
#[derive(Debug, Clone)]
pub struct Notices {
    current: Option<Notice>,
    success_ttl: Duration,
    error_ttl: Duration,
}

impl Notices {
    pub fn new(success_ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            current: None,
            success_ttl,
            error_ttl,
        }
    }

    pub fn from_config(config: &UiConfig) -> Self {
        Self::new(
            Duration::from_millis(config.success_notice_ms),
            Duration::from_millis(config.error_notice_ms),
        )
    }

    pub fn success(&mut self, message: impl Into<String>) -> &Notice {
        self.show(NoticeKind::Success, message.into())
    }

    pub fn error(&mut self, message: impl Into<String>) -> &Notice {
        self.show(NoticeKind::Error, message.into())
    }

    fn show(&mut self, kind: NoticeKind, message: String) -> &Notice {
        let ttl = match kind {
            NoticeKind::Success => self.success_ttl,
            NoticeKind::Error => self.error_ttl,
        };
        self.current.insert(Notice {
            kind,
            message,
            shown_at: Instant::now(),
            ttl,
        })
    }

    /// The visible notice, dismissing it first if its delay has passed
    pub fn current(&mut self) -> Option<&Notice> {
        let now = Instant::now();
        if self.current.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}
