use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn icon(self) -> &'static str {
        match self {
            NoticeLevel::Success => "✓",
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✕",
        }
    }
}

/// A transient toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Holds the toasts currently on screen, each with its own dismiss deadline.
///
/// Deadlines are measured from the clock last passed to [`Notifier::set_clock`],
/// the same clock [`Notifier::prune`] is driven by.
#[derive(Debug)]
pub struct Notifier {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
    clock: Instant,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 1,
            clock: Instant::now(),
        }
    }

    pub fn set_clock(&mut self, now: Instant) {
        self.clock = now;
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.push_at(self.clock, level, message)
    }

    pub fn push_at(&mut self, now: Instant, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, ?level, %message, "notification");
        self.items.push(Notification {
            id,
            level,
            message,
            expires_at: now + self.ttl,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    /// Manual close; cancels the pending auto-dismiss.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop every toast whose deadline has passed.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
