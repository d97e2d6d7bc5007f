use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub expires: Instant,
}

/// Short-lived operator feedback. Entries are neither merged nor deduplicated.
pub struct NotificationQueue {
    entries: Vec<Notification>,
    ttl: Duration,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        self.entries.push(Notification {
            severity,
            message: message.into(),
            expires: now + self.ttl,
        });
    }

    /// Drop expired entries. Returns true when anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.expires > now);
        self.entries.len() != before
    }

    pub fn visible(&self) -> &[Notification] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let mut q = NotificationQueue::new(Duration::from_secs(4));
        let t0 = Instant::now();
        q.push(Severity::Success, "Started web", t0);
        q.push(Severity::Success, "Started web", t0 + Duration::from_secs(1));
        assert_eq!(q.visible().len(), 2);

        assert!(!q.expire(t0 + Duration::from_secs(3)));
        assert!(q.expire(t0 + Duration::from_secs(4)));
        assert_eq!(q.visible().len(), 1);
        assert!(q.expire(t0 + Duration::from_secs(5)));
        assert!(q.visible().is_empty());
    }
}
