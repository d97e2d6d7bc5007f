use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, queue, style::{Print, SetForegroundColor, ResetColor, SetAttribute, Attribute}, terminal::{self, Clear, ClearType}};

use crate::model::{LogContent, LogViewState};
use crate::notifications::Notification;
use super::shared::{safe_truncate, truncate_str, write_notifications};
use super::theme::Palette;

pub fn render_logs(log_state: &LogViewState, notifications: &[Notification], palette: &Palette) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let size = terminal::size()?;
    let width = size.0 as usize;
    let height = size.1 as usize;

    // Header
    let follow_indicator = if log_state.auto_follow { "FOLLOWING" } else { "PAUSED" };
    let header = format!(
        "  Containers › Logs: {} @ {} (tail {}) - {}",
        log_state.target.name,
        log_state.target.server,
        log_state.tail(),
        follow_indicator
    );
    queue!(out, SetAttribute(Attribute::Bold))?;
    if !log_state.auto_follow {
        queue!(out, SetForegroundColor(palette.other_status))?;
    }
    write!(out, "{}\r\n", header)?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;

    // Tail prompt line while editing, separator otherwise
    if log_state.editing_tail {
        queue!(out, SetForegroundColor(palette.accent))?;
        write!(out, "  Tail lines: {}_\r\n", log_state.tail_input)?;
        queue!(out, ResetColor)?;
    } else {
        queue!(out, SetForegroundColor(palette.dim))?;
        write!(out, "{}\r\n", "─".repeat(width))?;
        queue!(out, ResetColor)?;
    }

    let log_area_height = height.saturating_sub(3 + notifications.len());
    let mut lines_printed = 0;
    match &log_state.content {
        LogContent::Loading => {
            queue!(out, SetForegroundColor(palette.dim))?;
            write!(out, "Loading...\r\n")?;
            queue!(out, ResetColor)?;
            lines_printed += 1;
        }
        LogContent::Failed(msg) => {
            queue!(out, SetForegroundColor(palette.error))?;
            write!(out, "Error: {}\r\n", safe_truncate(msg, width.saturating_sub(7)))?;
            queue!(out, ResetColor)?;
            lines_printed += 1;
        }
        LogContent::Loaded => {
            let total_lines = log_state.lines.len();
            let bottom_start = total_lines.saturating_sub(log_area_height);
            let start_line = if log_state.auto_follow {
                bottom_start
            } else {
                bottom_start.saturating_sub(log_state.scroll_offset)
            };
            for line in log_state.lines.iter().skip(start_line).take(log_area_height) {
                write!(out, "{}\r\n", safe_truncate(line, width))?;
                lines_printed += 1;
            }
        }
    }
    for _ in lines_printed..log_area_height {
        write!(out, "\r\n")?;
    }

    write_notifications(&mut out, notifications, width, palette)?;

    // Footer
    let help = if log_state.editing_tail {
        "Type a line count | Enter: Reload | Esc: Cancel"
    } else {
        "q/Esc/←: Back | ↑/↓/PgUp/PgDn: Scroll | f/End: Follow | r: Reload | t: Tail | c: Copy"
    };
    queue!(
        out,
        MoveTo(1, (height.saturating_sub(1)) as u16),
        SetForegroundColor(palette.dim),
        Print(truncate_str(help, width.saturating_sub(1))),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}
