//! Filter → sort → group derivation over an inventory snapshot.
//!
//! Everything here is pure: the same snapshot and view state always produce
//! the same display list.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Container, GroupKey, Snapshot, SortColumn, SortDirection, ViewFilterState};

/// One collapsible section of the grouped display list.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub server: String,
    pub project: String,
    /// Indices into `DisplayList::containers`, in sorted order.
    pub members: Vec<usize>,
}

/// Filtered, sorted and optionally grouped containers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub containers: Vec<Container>,
    pub groups: Option<Vec<Group>>,
}

impl DisplayList {
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }
}

pub fn derive(snapshot: &Snapshot, state: &ViewFilterState) -> DisplayList {
    let mut containers = filter(&snapshot.containers, state);
    sort(&mut containers, state.sort_column, state.sort_direction);
    let groups = state.group_by_project.then(|| group(&containers));
    DisplayList { containers, groups }
}

pub fn filter(containers: &[Container], state: &ViewFilterState) -> Vec<Container> {
    let term = state.search_term.trim().to_lowercase();
    containers
        .iter()
        .filter(|c| state.server_filter.matches(&c.server) && matches_search(c, &term))
        .cloned()
        .collect()
}

/// `term` must already be trimmed and lower-cased.
pub fn matches_search(c: &Container, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    c.name.to_lowercase().contains(term)
        || c.image.to_lowercase().contains(term)
        || c
            .ports
            .iter()
            .any(|p| p.host_port.contains(term) || p.container_port.contains(term))
}

pub fn sort(containers: &mut [Container], column: SortColumn, direction: SortDirection) {
    containers.sort_by(|a, b| {
        let ord = compare(a, b, column);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare(a: &Container, b: &Container, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Status => a.status.rank().cmp(&b.status.rank()),
        SortColumn::Ports => a.first_host_port().cmp(&b.first_host_port()),
        SortColumn::Name => cmp_ci(&a.name, &b.name),
        SortColumn::Server => cmp_ci(&a.server, &b.server),
        SortColumn::Image => cmp_ci(&a.image, &b.image),
    }
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Partition an already-sorted list by `server::project`. Groups come out in
/// the order their first member appears.
pub fn group(containers: &[Container]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for (i, c) in containers.iter().enumerate() {
        let key = c.group_key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                server: c.server.clone(),
                project: c.project().to_string(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(i);
    }
    groups
}
