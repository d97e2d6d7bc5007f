use std::collections::VecDeque;

use super::inventory::{RowId, leading_int};

pub const DEFAULT_TAIL: u32 = 200;

/// What the log pane currently shows. Reloading replaces it entirely.
#[derive(Clone, Debug, PartialEq)]
pub enum LogContent {
    Loading,
    Loaded,
    Failed(String),
}

// --- Log viewer state ---

pub struct LogViewState {
    pub target: RowId,
    pub lines: VecDeque<String>,
    pub content: LogContent,
    pub scroll_offset: usize, // 0 = at bottom (following)
    pub auto_follow: bool,
    pub tail_input: String,
    pub editing_tail: bool,
    /// Bumped on every load so late responses for an older load are dropped.
    pub request_seq: u64,
}

impl LogViewState {
    pub fn new(target: RowId, default_tail: u32) -> Self {
        Self {
            target,
            lines: VecDeque::new(),
            content: LogContent::Loading,
            scroll_offset: 0,
            auto_follow: true,
            tail_input: default_tail.to_string(),
            editing_tail: false,
            request_seq: 0,
        }
    }

    /// Tail count from the operator's input; invalid or zero falls back to 200.
    pub fn tail(&self) -> u32 {
        parse_tail(&self.tail_input)
    }

    /// Start a new load: content shows the loading placeholder.
    pub fn begin_load(&mut self) -> u64 {
        self.request_seq += 1;
        self.lines.clear();
        self.content = LogContent::Loading;
        self.scroll_offset = 0;
        self.auto_follow = true;
        self.request_seq
    }

    pub fn apply(&mut self, seq: u64, result: Result<String, String>) -> bool {
        if seq != self.request_seq {
            return false;
        }
        self.lines.clear();
        match result {
            Ok(text) => {
                self.lines.extend(text.lines().map(str::to_string));
                self.content = LogContent::Loaded;
            }
            Err(msg) => self.content = LogContent::Failed(msg),
        }
        true
    }

    /// Text currently on display, as offered to the clipboard.
    pub fn displayed_text(&self) -> String {
        match &self.content {
            LogContent::Loading => "Loading...".to_string(),
            LogContent::Loaded => self.lines.iter().cloned().collect::<Vec<_>>().join("\n"),
            LogContent::Failed(msg) => format!("Error: {}", msg),
        }
    }
}

pub fn parse_tail(input: &str) -> u32 {
    match leading_int(input) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => DEFAULT_TAIL,
    }
}
