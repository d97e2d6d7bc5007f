mod shared;
mod table;
mod theme;
mod containers;
mod logs;
mod confirmation;

use std::io::{self, Write};
use crossterm::{cursor, queue, style::{SetForegroundColor, ResetColor}, terminal};

use crate::dispatcher::ConfirmPrompt;
use crate::model::LogViewState;
use crate::notifications::Notification;

pub use containers::ContainersFrame;
pub use shared::{format_ports, safe_truncate, truncate_str};
pub use table::{ContainerRow, NoticeKind, ViewRow, build_view};
pub use theme::Palette;

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 80;
pub const MIN_ROWS: u16 = 12;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard(palette: &Palette) -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = io::stdout();
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(palette.other_status))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn render_containers(frame: &ContainersFrame) -> io::Result<()> {
        containers::render_containers(frame)
    }

    pub fn render_logs(log_state: &LogViewState, notifications: &[Notification], palette: &Palette) -> io::Result<()> {
        logs::render_logs(log_state, notifications, palette)
    }

    pub fn render_confirmation(prompt: &ConfirmPrompt, palette: &Palette) -> io::Result<()> {
        confirmation::render_confirmation(prompt, palette)
    }
}
