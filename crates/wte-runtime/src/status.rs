#![forbid(unsafe_code)]

//! Transient status messages.
//!
//! One message slot with an expiry deadline. Showing a message replaces the
//! previous one and restarts the timer; an empty message clears the slot.
//! Time is passed in explicitly through the `*_at` methods so tests stay
//! deterministic.

use std::time::Duration;

use web_time::Instant;

/// Default lifetime of a status message.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
    expires_at: Option<Instant>,
    ttl: Duration,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl StatusLine {
    /// Empty status line whose messages live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            message: String::new(),
            expires_at: None,
            ttl,
        }
    }

    /// Default message lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `message` for the default lifetime.
    pub fn show(&mut self, message: &str) {
        self.show_for_at(message, self.ttl, Instant::now());
    }

    /// Show `message` for `ttl`.
    pub fn show_for(&mut self, message: &str, ttl: Duration) {
        self.show_for_at(message, ttl, Instant::now());
    }

    pub fn show_for_at(&mut self, message: &str, ttl: Duration, now: Instant) {
        if message.is_empty() {
            self.clear();
            return;
        }
        self.message.clear();
        self.message.push_str(message);
        self.expires_at = Some(now + ttl);
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.expires_at = None;
    }

    /// Current message, if one is showing and has not expired.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message_at(Instant::now())
    }

    #[must_use]
    pub fn message_at(&self, now: Instant) -> Option<&str> {
        match self.expires_at {
            Some(deadline) if now < deadline => Some(self.message.as_str()),
            _ => None,
        }
    }

    /// Drop an expired message. Returns `true` when something was cleared.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}
