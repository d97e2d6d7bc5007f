//! Per-row lifecycle action state machine.
//!
//! ```text
//! Idle ─▶ Confirming ─▶ Pending ─▶ Settled ─▶ Cooldown ─▶ Idle
//!  │          │            │
//!  └──────────┴─(declined)─┴─(failed)──────────────────▶ Idle
//! ```
//!
//! `start` and `restart` skip `Confirming`. A row leaves `Idle` at most once
//! at a time; the lock is released only when the row is back in `Idle`.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::{Container, ContainerStatus, RowId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Remove,
}

impl ContainerAction {
    pub const ALL: [ContainerAction; 4] = [
        ContainerAction::Start,
        ContainerAction::Stop,
        ContainerAction::Restart,
        ContainerAction::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
            ContainerAction::Remove => "remove",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ContainerAction::Start => "started",
            ContainerAction::Stop => "stopped",
            ContainerAction::Restart => "restarted",
            ContainerAction::Remove => "removed",
        }
    }

    /// Disruptive actions need explicit operator confirmation.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, ContainerAction::Stop | ContainerAction::Remove)
    }

    /// Status shown right after a successful response, ahead of the next fetch.
    pub fn optimistic_status(&self) -> Option<ContainerStatus> {
        match self {
            ContainerAction::Start | ContainerAction::Restart => Some(ContainerStatus::Running),
            ContainerAction::Stop => Some(ContainerStatus::Exited),
            ContainerAction::Remove => None,
        }
    }

    pub fn prompt(&self, container: &str) -> ConfirmPrompt {
        match self {
            ContainerAction::Remove => ConfirmPrompt {
                title: "Remove Container".to_string(),
                message: format!(
                    "Are you sure you want to remove container \"{}\"? This action cannot be undone.",
                    container
                ),
                confirm_label: "Remove".to_string(),
            },
            _ => ConfirmPrompt {
                title: format!("{} Container", capitalize(self.as_str())),
                message: format!(
                    "Are you sure you want to {} container \"{}\"?",
                    self.as_str(),
                    container
                ),
                confirm_label: capitalize(self.as_str()),
            },
        }
    }
}

/// A no-op action is never offered: `start` while running, `stop` while exited.
pub fn affordance_enabled(action: ContainerAction, status: &ContainerStatus) -> bool {
    match action {
        ContainerAction::Start => *status != ContainerStatus::Running,
        ContainerAction::Stop => *status != ContainerStatus::Exited,
        ContainerAction::Restart | ContainerAction::Remove => true,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
}

/// Outcome of a confirmation prompt. Declining is a normal result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RowPhase {
    Idle,
    Confirming(ContainerAction),
    Pending(ContainerAction),
    Settled { action: ContainerAction, at: Instant },
    Cooldown { until: Instant },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowActionState {
    pub phase: RowPhase,
    pub status: ContainerStatus,
    /// Set after a successful remove; the row stays inert until a fetch
    /// drops it.
    pub removed: bool,
}

impl RowActionState {
    fn new(status: ContainerStatus) -> Self {
        Self {
            phase: RowPhase::Idle,
            status,
            removed: false,
        }
    }

    pub fn locked(&self) -> bool {
        self.removed || self.phase != RowPhase::Idle
    }

    pub fn is_enabled(&self, action: ContainerAction) -> bool {
        !self.locked() && affordance_enabled(action, &self.status)
    }
}

/// Work the caller must perform for a row that entered `Pending`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCommand {
    pub row: RowId,
    pub action: ContainerAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    UnknownRow,
    Locked,
    Disabled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    Confirm(ConfirmPrompt),
    Dispatch(ActionCommand),
    Rejected(Rejection),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Settlement {
    /// Optimistic status applied; caller notifies and schedules a refetch.
    Succeeded { row: RowId, action: ContainerAction, message: String },
    /// Status untouched; caller notifies.
    Failed { row: RowId, action: ContainerAction, message: String },
}

pub struct ActionDispatcher {
    rows: HashMap<RowId, RowActionState>,
    cooldown: Duration,
}

impl ActionDispatcher {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            rows: HashMap::new(),
            cooldown,
        }
    }

    pub fn row(&self, id: &RowId) -> Option<&RowActionState> {
        self.rows.get(id)
    }

    /// Reconcile row states with the rows about to be rendered.
    ///
    /// New rows start `Idle` with the snapshot status. When `fresh_snapshot`
    /// is set, idle rows take the snapshot status again, dropping optimistic
    /// values. Idle rows that are no longer displayed are discarded; busy rows
    /// are kept so their lock survives filtering. Removed rows are kept until
    /// a fresh snapshot arrives.
    pub fn sync_rows(&mut self, displayed: &[Container], fresh_snapshot: bool) {
        let shown: HashSet<RowId> = displayed.iter().map(Container::id).collect();
        self.rows.retain(|id, state| {
            shown.contains(id)
                || state.phase != RowPhase::Idle
                || (state.removed && !fresh_snapshot)
        });

        for c in displayed {
            let state = self
                .rows
                .entry(c.id())
                .or_insert_with(|| RowActionState::new(c.status.clone()));
            if fresh_snapshot && state.phase == RowPhase::Idle {
                state.status = c.status.clone();
                state.removed = false;
            }
        }
    }

    /// Operator asked for `action` on `id`.
    pub fn request(&mut self, id: &RowId, action: ContainerAction) -> DispatchOutcome {
        let Some(state) = self.rows.get_mut(id) else {
            return DispatchOutcome::Rejected(Rejection::UnknownRow);
        };
        if state.locked() {
            return DispatchOutcome::Rejected(Rejection::Locked);
        }
        if !affordance_enabled(action, &state.status) {
            return DispatchOutcome::Rejected(Rejection::Disabled);
        }

        if action.needs_confirmation() {
            state.phase = RowPhase::Confirming(action);
            debug!(%id, action = action.as_str(), "awaiting confirmation");
            DispatchOutcome::Confirm(action.prompt(&id.name))
        } else {
            state.phase = RowPhase::Pending(action);
            debug!(%id, action = action.as_str(), "pending");
            DispatchOutcome::Dispatch(ActionCommand {
                row: id.clone(),
                action,
            })
        }
    }

    /// Resolve a prompt opened by [`request`](Self::request).
    pub fn resolve_confirmation(&mut self, id: &RowId, answer: Confirmation) -> Option<ActionCommand> {
        let state = self.rows.get_mut(id)?;
        let RowPhase::Confirming(action) = state.phase else {
            return None;
        };
        match answer {
            Confirmation::Confirmed => {
                state.phase = RowPhase::Pending(action);
                debug!(%id, action = action.as_str(), "confirmed, pending");
                Some(ActionCommand {
                    row: id.clone(),
                    action,
                })
            }
            Confirmation::Declined => {
                state.phase = RowPhase::Idle;
                debug!(%id, action = action.as_str(), "declined");
                None
            }
        }
    }

    /// Apply the service's answer for an in-flight action.
    pub fn complete(
        &mut self,
        id: &RowId,
        action: ContainerAction,
        result: Result<String, String>,
        now: Instant,
    ) -> Settlement {
        let state = self
            .rows
            .get_mut(id)
            .filter(|s| s.phase == RowPhase::Pending(action));

        match result {
            Ok(message) => {
                if let Some(state) = state {
                    match action.optimistic_status() {
                        Some(status) => state.status = status,
                        None => state.removed = true,
                    }
                    state.phase = RowPhase::Settled { action, at: now };
                } else {
                    debug!(%id, "completion for a row that is not pending");
                }
                Settlement::Succeeded {
                    row: id.clone(),
                    action,
                    message,
                }
            }
            Err(message) => {
                if let Some(state) = state {
                    state.phase = RowPhase::Idle;
                }
                Settlement::Failed {
                    row: id.clone(),
                    action,
                    message,
                }
            }
        }
    }

    /// Move settled rows into cooldown and release expired cooldowns.
    /// Returns true when any row changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for state in self.rows.values_mut() {
            if let RowPhase::Settled { at, .. } = state.phase {
                state.phase = RowPhase::Cooldown {
                    until: at + self.cooldown,
                };
                changed = true;
            }
            if let RowPhase::Cooldown { until } = state.phase {
                if now >= until {
                    state.phase = RowPhase::Idle;
                    changed = true;
                }
            }
        }
        changed
    }

}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}
