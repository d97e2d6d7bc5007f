use std::time::Instant;

use crate::dispatcher::{ConfirmPrompt, Confirmation};
use crate::model::RowId;
use crate::view::ViewRow;

/// Confirmation banner awaiting a `y`.
pub struct PendingAction {
    pub prompt: ConfirmPrompt,
    pub kind: PendingActionKind,
    pub expires: Instant,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PendingActionKind {
    Container(RowId),
    Export,
}

impl PendingAction {
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires
    }
}

/// `y`/`Y` confirms; every other key declines.
pub fn answer_for(c: Option<char>) -> Confirmation {
    match c {
        Some('y') | Some('Y') => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    }
}

/// Keep the selection inside the rebuilt row list.
pub fn clamp_selection(selected: usize, rows: &[ViewRow]) -> usize {
    if rows.is_empty() {
        0
    } else {
        selected.min(rows.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::view::NoticeKind;

    #[test]
    fn only_y_confirms() {
        assert_eq!(answer_for(Some('y')), Confirmation::Confirmed);
        assert_eq!(answer_for(Some('Y')), Confirmation::Confirmed);
        assert_eq!(answer_for(Some('n')), Confirmation::Declined);
        assert_eq!(answer_for(None), Confirmation::Declined);
    }

    #[test]
    fn pending_action_expires_after_deadline() {
        let now = Instant::now();
        let pa = PendingAction {
            prompt: crate::export::prompt(),
            kind: PendingActionKind::Export,
            expires: now + Duration::from_secs(5),
        };
        assert!(!pa.is_expired(now + Duration::from_secs(5)));
        assert!(pa.is_expired(now + Duration::from_secs(6)));
    }

    #[test]
    fn selection_clamps_to_rows() {
        let rows = vec![ViewRow::Notice { kind: NoticeKind::Loading, text: "Loading...".into() }];
        assert_eq!(clamp_selection(7, &rows), 0);
        assert_eq!(clamp_selection(3, &[]), 0);
    }
}
