use std::time::Instant;

use tracing::debug;

use crate::dispatcher::Confirmation;

use super::App;
use super::state::PendingActionKind;

impl App {
    /// Redraw once per tick so the header clock moves.
    pub fn process_tick(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) < self.tick_rate {
            return false;
        }
        self.last_tick = now;
        true
    }

    /// Apply finished network work.
    pub fn poll_backend(&mut self) -> bool {
        self.monitor.poll_events(Instant::now())
    }

    /// Cooldowns and notification expiry.
    pub fn advance_timers(&mut self) -> bool {
        self.monitor.tick(Instant::now())
    }

    /// An unanswered prompt counts as declined once it times out.
    pub fn expire_pending_action(&mut self) -> bool {
        let now = Instant::now();
        let expired = self
            .pending_action
            .as_ref()
            .is_some_and(|pa| pa.is_expired(now));
        if !expired {
            return false;
        }
        if let Some(pa) = self.pending_action.take() {
            debug!(title = %pa.prompt.title, "confirmation timed out");
            self.settle_pending(pa.kind, Confirmation::Declined);
        }
        true
    }

    pub(super) fn settle_pending(&mut self, kind: PendingActionKind, answer: Confirmation) {
        match kind {
            PendingActionKind::Container(row) => {
                self.monitor.resolve_confirmation(&row, answer);
            }
            PendingActionKind::Export => {
                if answer == Confirmation::Confirmed {
                    self.monitor.confirm_export(Instant::now());
                }
            }
        }
    }
}
