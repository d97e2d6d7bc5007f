//! Host filter toggles and their availability.

use std::cmp::Ordering;

use tracing::warn;

use crate::model::{Server, ServerFilter, Snapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct FilterToggle {
    pub label: String,
    pub filter: ServerFilter,
    pub enabled: bool,
    /// Tooltip-style hint, set for offline servers.
    pub title: Option<String>,
}

/// Toggle set for the snapshot. Empty in single-server mode: at most one
/// server, or none active.
pub fn build_toggles(servers: &[Server]) -> Vec<FilterToggle> {
    if servers.len() <= 1 || !servers.iter().any(Server::is_active) {
        return Vec::new();
    }

    let mut ordered: Vec<&Server> = servers.iter().collect();
    ordered.sort_by(|a, b| compare_servers(a, b));

    let mut toggles = Vec::with_capacity(ordered.len() + 1);
    toggles.push(FilterToggle {
        label: "All".to_string(),
        filter: ServerFilter::All,
        enabled: true,
        title: None,
    });
    toggles.extend(ordered.into_iter().map(|s| FilterToggle {
        label: s.name.clone(),
        filter: ServerFilter::Server(s.name.clone()),
        enabled: s.is_active(),
        title: (!s.is_active()).then(|| format!("{} is offline", s.name)),
    }));
    toggles
}

/// Active before inactive, then explicit `order`, then name.
fn compare_servers(a: &Server, b: &Server) -> Ordering {
    b.is_active()
        .cmp(&a.is_active())
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| a.name.cmp(&b.name))
}

/// True when the current filter must fall back to "all" for this snapshot.
pub fn needs_reset(filter: &ServerFilter, snapshot: &Snapshot) -> bool {
    let ServerFilter::Server(name) = filter else {
        return false;
    };
    match snapshot.server(name) {
        None => true,
        Some(server) => !server.is_active(),
    }
}

/// Apply the reset rule in place. Returns true when the filter changed.
pub fn reconcile(filter: &mut ServerFilter, snapshot: &Snapshot) -> bool {
    if needs_reset(filter, snapshot) {
        warn!(?filter, "server filter reset to \"all\" due to server unavailability");
        *filter = ServerFilter::All;
        return true;
    }
    false
}

/// Host column hidden and no toggles: at most one server, or none active.
pub fn single_server_mode(snapshot: &Snapshot) -> bool {
    snapshot.servers.len() <= 1 || !snapshot.has_active_server()
}

/// Next enabled toggle after (or before) the current filter, wrapping.
pub fn cycle(toggles: &[FilterToggle], current: &ServerFilter, forward: bool) -> Option<ServerFilter> {
    let enabled: Vec<&FilterToggle> = toggles.iter().filter(|t| t.enabled).collect();
    if enabled.is_empty() {
        return None;
    }
    let pos = enabled.iter().position(|t| &t.filter == current);
    let next = match (pos, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % enabled.len(),
        (Some(i), false) => (i + enabled.len() - 1) % enabled.len(),
    };
    Some(enabled[next].filter.clone())
}
