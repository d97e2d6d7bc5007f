//! Display list → view rows. Always a full rebuild.

use crate::dispatcher::{ActionDispatcher, ContainerAction, RowPhase, affordance_enabled};
use crate::model::{Container, ContainerStatus, GroupKey, PortMapping, RowId};
use crate::store::InventoryStore;

#[derive(Clone, Debug, PartialEq)]
pub enum NoticeKind {
    Loading,
    Empty,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerRow {
    pub id: RowId,
    pub image: String,
    pub status: ContainerStatus,
    pub ports: Vec<PortMapping>,
    /// Enabled flag per action, in `ContainerAction::ALL` order.
    pub enabled: [bool; 4],
    pub logs_enabled: bool,
    pub locked: bool,
    pub removed: bool,
    pub in_flight: Option<ContainerAction>,
}

impl ContainerRow {
    fn new(c: &Container, dispatcher: &ActionDispatcher) -> Self {
        let state = dispatcher.row(&c.id());
        let status = state.map_or_else(|| c.status.clone(), |s| s.status.clone());
        let locked = state.is_some_and(|s| s.locked());
        let enabled = ContainerAction::ALL.map(|a| !locked && affordance_enabled(a, &status));
        let removed = state.is_some_and(|s| s.removed);
        let in_flight = state.and_then(|s| match s.phase {
            RowPhase::Confirming(a) | RowPhase::Pending(a) => Some(a),
            _ => None,
        });
        Self {
            id: c.id(),
            image: c.image.clone(),
            status,
            ports: c.ports.clone(),
            enabled,
            logs_enabled: !removed,
            locked,
            removed,
            in_flight,
        }
    }

    pub fn is_enabled(&self, action: ContainerAction) -> bool {
        ContainerAction::ALL
            .iter()
            .position(|a| *a == action)
            .is_some_and(|i| self.enabled[i])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewRow {
    Notice { kind: NoticeKind, text: String },
    GroupHeader {
        key: GroupKey,
        project: String,
        server: String,
        collapsed: bool,
        count: usize,
    },
    Container(ContainerRow),
}

pub fn build_view(store: &InventoryStore, dispatcher: &ActionDispatcher) -> Vec<ViewRow> {
    if let Some(err) = store.error() {
        return vec![ViewRow::Notice {
            kind: NoticeKind::Error,
            text: err.to_string(),
        }];
    }
    if !store.is_loaded() {
        return vec![ViewRow::Notice {
            kind: NoticeKind::Loading,
            text: "Loading...".to_string(),
        }];
    }

    let display = store.display();
    if display.is_empty() {
        let text = if store.filter().is_narrowed() {
            "No containers found matching your criteria."
        } else {
            "No containers to display."
        };
        return vec![ViewRow::Notice {
            kind: NoticeKind::Empty,
            text: text.to_string(),
        }];
    }

    let mut rows = Vec::with_capacity(display.len());
    match &display.groups {
        None => {
            rows.extend(
                display
                    .containers
                    .iter()
                    .map(|c| ViewRow::Container(ContainerRow::new(c, dispatcher))),
            );
        }
        Some(groups) => {
            for group in groups {
                let collapsed = store.filter().is_collapsed(&group.key);
                rows.push(ViewRow::GroupHeader {
                    key: group.key.clone(),
                    project: group.project.clone(),
                    server: group.server.clone(),
                    collapsed,
                    count: group.members.len(),
                });
                if collapsed {
                    continue;
                }
                for &i in &group.members {
                    rows.push(ViewRow::Container(ContainerRow::new(
                        &display.containers[i],
                        dispatcher,
                    )));
                }
            }
        }
    }
    rows
}
