use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::client::DashboardClient;
use crate::clipboard;
use crate::config::Config;
use crate::dispatcher::{
    ActionCommand, ActionDispatcher, Confirmation, ConfirmPrompt, ContainerAction, DispatchOutcome,
    Settlement,
};
use crate::export;
use crate::model::{LogViewState, RowId, Snapshot};
use crate::notifications::{NotificationQueue, Severity};
use crate::store::{FetchApplied, InventoryStore};

/// Results handed back from the background runtime to the UI thread.
#[derive(Debug)]
pub enum BackendEvent {
    InventoryLoaded {
        seq: u64,
        result: Result<Snapshot, String>,
    },
    ActionCompleted {
        row: RowId,
        action: ContainerAction,
        result: Result<String, String>,
    },
    LogsLoaded {
        target: RowId,
        seq: u64,
        result: Result<String, String>,
    },
    RefreshDue,
}

/// Owns the dashboard state and the network work behind it.
///
/// Requests run on the shared tokio runtime; their results come back over a
/// channel and are applied on the UI thread by [`poll_events`](Self::poll_events).
pub struct DashboardMonitor {
    rt: Arc<tokio::runtime::Runtime>,
    client: DashboardClient,
    config: Config,
    pub store: InventoryStore,
    pub dispatcher: ActionDispatcher,
    pub notifications: NotificationQueue,
    pub log_state: Option<LogViewState>,
    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,
}

impl DashboardMonitor {
    pub fn new(rt: Arc<tokio::runtime::Runtime>, config: Config) -> Self {
        let client = DashboardClient::new(&config.base_url, config.request_timeout);
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            rt,
            client,
            store: InventoryStore::new(),
            dispatcher: ActionDispatcher::new(config.action_cooldown),
            notifications: NotificationQueue::new(config.notification_ttl),
            log_state: None,
            config,
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- Inventory ---

    /// Issue `GET /data` in the background.
    pub fn fetch(&mut self) {
        let seq = self.store.begin_fetch();
        debug!(seq, "fetching inventory");
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.rt.spawn(async move {
            let result = client.fetch_inventory().await.map_err(|e| e.to_string());
            let _ = tx.send(BackendEvent::InventoryLoaded { seq, result });
        });
    }

    /// Mutate view state through the store, then resync per-row action state
    /// with whatever is now displayed.
    pub fn update_view<R>(&mut self, f: impl FnOnce(&mut InventoryStore) -> R) -> R {
        let out = f(&mut self.store);
        self.sync_rows();
        out
    }

    fn sync_rows(&mut self) {
        let fresh = self.store.take_fresh();
        self.dispatcher
            .sync_rows(&self.store.display().containers, fresh);
    }

    // --- Background results ---

    /// Drain finished background work. Returns true if anything visible changed.
    pub fn poll_events(&mut self, now: Instant) -> bool {
        let mut needs_render = false;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    self.handle_event(event, now);
                    needs_render = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        needs_render
    }

    pub fn handle_event(&mut self, event: BackendEvent, now: Instant) {
        match event {
            BackendEvent::InventoryLoaded { seq, result } => {
                if self.store.apply_fetch(seq, result) == FetchApplied::Applied {
                    self.sync_rows();
                }
            }
            BackendEvent::ActionCompleted { row, action, result } => {
                match self.dispatcher.complete(&row, action, result, now) {
                    Settlement::Succeeded { message, .. } => {
                        info!(%row, action = action.as_str(), "action succeeded");
                        self.notifications.push(Severity::Success, message, now);
                        self.schedule_refresh();
                    }
                    Settlement::Failed { message, .. } => {
                        error!(%row, action = action.as_str(), %message, "action failed");
                        self.notifications.push(Severity::Error, message, now);
                    }
                }
            }
            BackendEvent::LogsLoaded { target, seq, result } => match self.log_state.as_mut() {
                Some(state) if state.target == target => {
                    if !state.apply(seq, result) {
                        debug!(%target, seq, "dropping stale log response");
                    }
                }
                _ => debug!(%target, "log response for a closed viewer"),
            },
            BackendEvent::RefreshDue => self.fetch(),
        }
    }

    /// Advance timers: action cooldowns and notification expiry.
    pub fn tick(&mut self, now: Instant) -> bool {
        let advanced = self.dispatcher.advance(now);
        let expired = self.notifications.expire(now);
        advanced || expired
    }

    // --- Container actions ---

    /// Returns the prompt to show when the action needs confirmation.
    pub fn request_action(&mut self, row: &RowId, action: ContainerAction) -> Option<ConfirmPrompt> {
        match self.dispatcher.request(row, action) {
            DispatchOutcome::Confirm(prompt) => Some(prompt),
            DispatchOutcome::Dispatch(cmd) => {
                self.spawn_action(cmd);
                None
            }
            DispatchOutcome::Rejected(reason) => {
                debug!(%row, action = action.as_str(), ?reason, "action request rejected");
                None
            }
        }
    }

    pub fn resolve_confirmation(&mut self, row: &RowId, answer: Confirmation) {
        if let Some(cmd) = self.dispatcher.resolve_confirmation(row, answer) {
            self.spawn_action(cmd);
        }
    }

    fn spawn_action(&self, cmd: ActionCommand) {
        info!(row = %cmd.row, action = cmd.action.as_str(), "dispatching action");
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.rt.spawn(async move {
            let result = client
                .perform_action(&cmd.row, cmd.action)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(BackendEvent::ActionCompleted {
                row: cmd.row,
                action: cmd.action,
                result,
            });
        });
    }

    /// One refetch after a successful action. Never cancelled.
    fn schedule_refresh(&self) {
        let delay = self.config.refresh_after_action;
        let tx = self.events_tx.clone();
        self.rt.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(BackendEvent::RefreshDue);
        });
    }

    // --- Logs viewer ---

    pub fn open_logs(&mut self, row: RowId) {
        self.log_state = Some(LogViewState::new(row, self.config.default_tail));
        self.load_logs();
    }

    /// (Re)load the open viewer with its current tail count.
    pub fn load_logs(&mut self) {
        let Some(state) = self.log_state.as_mut() else { return };
        let seq = state.begin_load();
        let target = state.target.clone();
        let tail = state.tail();
        debug!(%target, tail, seq, "loading logs");

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.rt.spawn(async move {
            let result = client.fetch_logs(&target, tail).await.map_err(|e| e.to_string());
            let _ = tx.send(BackendEvent::LogsLoaded { target, seq, result });
        });
    }

    pub fn close_logs(&mut self) {
        self.log_state = None;
    }

    pub fn copy_logs(&mut self, now: Instant) {
        let Some(state) = self.log_state.as_ref() else { return };
        match clipboard::copy(&state.displayed_text()) {
            Ok(()) => self
                .notifications
                .push(Severity::Success, "Logs copied to clipboard", now),
            Err(e) => {
                error!(error = %e, "clipboard copy failed");
                self.notifications
                    .push(Severity::Error, "Failed to copy logs", now);
            }
        }
    }

    // --- Export ---

    /// Prompt for an export, or report that there is nothing to export.
    pub fn request_export(&mut self, now: Instant) -> Option<ConfirmPrompt> {
        if self.store.display().is_empty() {
            self.notifications
                .push(Severity::Info, export::EMPTY_EXPORT, now);
            return None;
        }
        Some(export::prompt())
    }

    pub fn confirm_export(&mut self, now: Instant) {
        let generated = Utc::now();
        let doc = export::build(&self.store.display().containers, generated);
        match export::write(&self.config.export_dir, &doc, generated) {
            Ok(path) => self.notifications.push(
                Severity::Success,
                format!("Exported {} containers to {}", doc.containers.len(), path.display()),
                now,
            ),
            Err(e) => {
                error!(error = %e, "export failed");
                self.notifications
                    .push(Severity::Error, format!("Export failed: {}", e), now);
            }
        }
    }
}
