use super::inventory::RowId;

/// App-level view state
#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Containers,
    ContainerLogs(RowId),
}
