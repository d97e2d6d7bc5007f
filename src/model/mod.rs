// Re-export all model types from submodules.

pub use app::AppView;
pub use inventory::{
    Container, ContainerStatus, GroupKey, PortMapping, RowId, Server, ServerStatus, Snapshot,
    UNGROUPED, leading_int,
};
pub use logs::{DEFAULT_TAIL, LogContent, LogViewState, parse_tail};
pub use view_state::{ServerFilter, SortColumn, SortDirection, ViewFilterState};

mod app;
mod inventory;
mod logs;
mod view_state;
