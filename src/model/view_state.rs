use std::collections::HashSet;

use super::inventory::GroupKey;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Server,
    Image,
    Status,
    Ports,
}

impl SortColumn {
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "NAME",
            SortColumn::Server => "SERVER",
            SortColumn::Image => "IMAGE",
            SortColumn::Status => "STATUS",
            SortColumn::Ports => "PORTS",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum ServerFilter {
    #[default]
    All,
    Server(String),
}

impl ServerFilter {
    pub fn matches(&self, server: &str) -> bool {
        match self {
            ServerFilter::All => true,
            ServerFilter::Server(name) => name == server,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ServerFilter::All)
    }
}

/// Operator-controlled view state. Lives only as long as the process.
#[derive(Clone, Debug)]
pub struct ViewFilterState {
    pub search_term: String,
    pub server_filter: ServerFilter,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub group_by_project: bool,
    pub collapsed_groups: HashSet<GroupKey>,
}

impl Default for ViewFilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            server_filter: ServerFilter::All,
            sort_column: SortColumn::Name,
            sort_direction: SortDirection::Asc,
            group_by_project: true,
            collapsed_groups: HashSet::new(),
        }
    }
}

impl ViewFilterState {
    /// Header-click semantics: same column flips direction, a new column
    /// starts ascending.
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn toggle_group(&mut self, key: &GroupKey) {
        if !self.collapsed_groups.remove(key) {
            self.collapsed_groups.insert(key.clone());
        }
    }

    pub fn is_collapsed(&self, key: &GroupKey) -> bool {
        self.collapsed_groups.contains(key)
    }

    /// True when the operator narrowed the list (search or server filter).
    pub fn is_narrowed(&self) -> bool {
        !self.search_term.trim().is_empty() || !self.server_filter.is_all()
    }
}
