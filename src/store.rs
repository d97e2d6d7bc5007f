//! Inventory snapshot plus the operator's view state, with a single owner.

use tracing::{debug, info, warn};

use crate::model::{GroupKey, ServerFilter, Snapshot, SortColumn, ViewFilterState};
use crate::pipeline::{self, DisplayList};
use crate::server_filter::{self, FilterToggle};

#[derive(Clone, Debug, PartialEq)]
pub enum FetchApplied {
    Applied,
    /// A newer fetch already landed; this response was dropped.
    Stale,
    Failed(String),
}

pub struct InventoryStore {
    snapshot: Snapshot,
    loaded: bool,
    filter: ViewFilterState,
    display: DisplayList,
    toggles: Vec<FilterToggle>,
    single_server: bool,
    error: Option<String>,
    next_seq: u64,
    applied_seq: u64,
    in_flight: usize,
    fresh: bool,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            loaded: false,
            filter: ViewFilterState::default(),
            display: DisplayList::default(),
            toggles: Vec::new(),
            single_server: true,
            error: None,
            next_seq: 0,
            applied_seq: 0,
            in_flight: 0,
            fresh: false,
        }
    }

    // --- Fetch cycle ---

    /// Register an outgoing fetch and return its sequence number.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.in_flight += 1;
        self.next_seq
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Apply a fetch response. Servers and containers are swapped together;
    /// on failure the previous snapshot and filter are left as they were.
    pub fn apply_fetch(&mut self, seq: u64, result: Result<Snapshot, String>) -> FetchApplied {
        self.in_flight = self.in_flight.saturating_sub(1);
        if seq < self.applied_seq {
            debug!(seq, applied = self.applied_seq, "dropping stale inventory response");
            return FetchApplied::Stale;
        }
        self.applied_seq = seq;

        match result {
            Ok(snapshot) => {
                info!(
                    servers = snapshot.servers.len(),
                    containers = snapshot.containers.len(),
                    "inventory updated"
                );
                self.snapshot = snapshot;
                self.loaded = true;
                self.error = None;
                server_filter::reconcile(&mut self.filter.server_filter, &self.snapshot);
                self.single_server = server_filter::single_server_mode(&self.snapshot);
                if !self.snapshot.has_active_server() {
                    warn!("no active servers available, using single-server mode");
                }
                self.toggles = server_filter::build_toggles(&self.snapshot.servers);
                self.fresh = true;
                self.rederive();
                FetchApplied::Applied
            }
            Err(message) => {
                warn!(%message, "inventory fetch failed");
                self.error = Some(message.clone());
                FetchApplied::Failed(message)
            }
        }
    }

    // --- Operator view state ---

    pub fn set_search(&mut self, term: &str) {
        self.filter.search_term = term.to_string();
        self.rederive();
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.filter.sort_by(column);
        self.rederive();
    }

    pub fn toggle_grouping(&mut self) {
        self.filter.group_by_project = !self.filter.group_by_project;
        self.rederive();
    }

    /// Select a host filter. Disabled (offline) toggles are refused.
    pub fn select_server(&mut self, filter: ServerFilter) -> bool {
        let allowed = self
            .toggles
            .iter()
            .any(|t| t.enabled && t.filter == filter);
        if !allowed {
            return false;
        }
        self.filter.server_filter = filter;
        self.rederive();
        true
    }

    pub fn cycle_server(&mut self, forward: bool) -> bool {
        match server_filter::cycle(&self.toggles, &self.filter.server_filter, forward) {
            Some(next) => self.select_server(next),
            None => false,
        }
    }

    /// Collapse state only; the display list is reused as is.
    pub fn toggle_group(&mut self, key: &GroupKey) {
        self.filter.toggle_group(key);
    }

    fn rederive(&mut self) {
        self.display = pipeline::derive(&self.snapshot, &self.filter);
    }

    // --- Readers ---

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn filter(&self) -> &ViewFilterState {
        &self.filter
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn toggles(&self) -> &[FilterToggle] {
        &self.toggles
    }

    pub fn single_server(&self) -> bool {
        self.single_server
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once after each applied snapshot.
    pub fn take_fresh(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, ContainerStatus, Server, ServerStatus};

    fn snap(servers: &[(&str, bool)], containers: &[(&str, &str)]) -> Snapshot {
        Snapshot {
            servers: servers
                .iter()
                .map(|(n, active)| Server {
                    name: (*n).into(),
                    status: if *active { ServerStatus::Active } else { ServerStatus::Inactive },
                    order: 0,
                })
                .collect(),
            containers: containers
                .iter()
                .map(|(name, server)| Container {
                    name: (*name).into(),
                    server: (*server).into(),
                    image: "img".into(),
                    status: ContainerStatus::Running,
                    compose_project: None,
                    ports: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn stale_response_never_overwrites_newer_snapshot() {
        let mut store = InventoryStore::new();
        let first = store.begin_fetch();
        let second = store.begin_fetch();
        assert!(store.is_busy());

        let newer = snap(&[("h1", true)], &[("new", "h1")]);
        assert_eq!(store.apply_fetch(second, Ok(newer)), FetchApplied::Applied);
        let older = snap(&[("h1", true)], &[("old", "h1")]);
        assert_eq!(store.apply_fetch(first, Ok(older)), FetchApplied::Stale);

        assert!(!store.is_busy());
        assert_eq!(store.display().containers[0].name, "new");
    }

    #[test]
    fn failure_keeps_previous_snapshot_and_filter() {
        let mut store = InventoryStore::new();
        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("h1", true), ("h2", true)], &[("a", "h1"), ("b", "h2")])));
        assert!(store.select_server(ServerFilter::Server("h2".into())));

        let seq = store.begin_fetch();
        let outcome = store.apply_fetch(seq, Err("Server Error (500): Please try again later".into()));
        assert!(matches!(outcome, FetchApplied::Failed(_)));
        assert_eq!(store.error(), Some("Server Error (500): Please try again later"));
        assert_eq!(store.snapshot().containers.len(), 2);
        assert_eq!(store.filter().server_filter, ServerFilter::Server("h2".into()));
        assert_eq!(store.display().len(), 1);
    }

    #[test]
    fn new_snapshot_resets_filter_for_offline_server() {
        let mut store = InventoryStore::new();
        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("h1", true), ("h2", true)], &[("a", "h1"), ("b", "h2")])));
        store.select_server(ServerFilter::Server("h2".into()));

        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("h1", true), ("h2", false)], &[("a", "h1")])));
        assert_eq!(store.filter().server_filter, ServerFilter::All);
        assert!(store.take_fresh());
        assert!(!store.take_fresh());
    }

    #[test]
    fn offline_toggle_cannot_be_selected() {
        let mut store = InventoryStore::new();
        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("h1", true), ("h2", false)], &[])));
        assert!(!store.select_server(ServerFilter::Server("h2".into())));
        assert_eq!(store.filter().server_filter, ServerFilter::All);
    }

    #[test]
    fn all_servers_offline_hides_toggles() {
        let mut store = InventoryStore::new();
        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("a", false), ("b", false)], &[("x", "a")])));
        assert!(store.single_server());
        assert!(store.toggles().is_empty());
        assert!(!store.cycle_server(true));
    }

    #[test]
    fn group_toggle_does_not_rederive() {
        let mut store = InventoryStore::new();
        let seq = store.begin_fetch();
        store.apply_fetch(seq, Ok(snap(&[("h1", true)], &[("a", "h1")])));
        let before = store.display().clone();
        store.toggle_group(&GroupKey::new("h1", "Ungrouped"));
        assert_eq!(store.display(), &before);
        assert!(store.filter().is_collapsed(&GroupKey::new("h1", "Ungrouped")));
    }
}
