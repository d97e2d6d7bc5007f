use std::io::{self, Write, stdout};
use crossterm::{cursor, queue, style::{Print, SetForegroundColor, SetBackgroundColor, ResetColor, SetAttribute, Attribute}, terminal::{self, Clear, ClearType}};

use crate::dispatcher::ContainerAction;
use crate::model::SortColumn;
use crate::notifications::Notification;
use crate::store::InventoryStore;
use super::shared::{format_ports, truncate_str, write_notifications, write_section_header, write_selectable, writeln};
use super::table::{ContainerRow, NoticeKind, ViewRow};
use super::theme::Palette;

const NAME_W: usize = 24;
const HOST_W: usize = 14;
const IMAGE_W: usize = 26;
const STATUS_W: usize = 10;
const PORTS_W: usize = 24;

/// Lines above the table: title, toggles, search/sort line, column header.
const HEADER_LINES: usize = 4;

pub struct ContainersFrame<'a> {
    pub store: &'a InventoryStore,
    pub rows: &'a [ViewRow],
    pub selected: usize,
    pub notifications: &'a [Notification],
    pub search_editing: bool,
    pub base_url: &'a str,
    pub clock: &'a str,
    pub palette: &'a Palette,
}

pub fn render_containers(frame: &ContainersFrame) -> io::Result<()> {
    let mut out = stdout();
    let palette = frame.palette;
    let (cols, rows) = terminal::size()?;
    let width = cols as usize;
    let height = rows as usize;

    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    render_title(&mut out, frame, width)?;
    render_toggles(&mut out, frame)?;
    render_search_line(&mut out, frame)?;
    render_column_header(&mut out, frame)?;

    // Table body, scrolled so the selection stays visible
    let body_height = height
        .saturating_sub(HEADER_LINES + 1 + frame.notifications.len())
        .max(1);
    let start = frame.selected.saturating_sub(body_height.saturating_sub(1));
    let end = (start + body_height).min(frame.rows.len());
    for (idx, row) in frame.rows.iter().enumerate().take(end).skip(start) {
        let selected = idx == frame.selected;
        match row {
            ViewRow::Notice { kind, text } => {
                let color = match kind {
                    NoticeKind::Error => palette.error,
                    NoticeKind::Loading | NoticeKind::Empty => palette.dim,
                };
                queue!(out, SetForegroundColor(color))?;
                writeln(&mut out, "")?;
                writeln(&mut out, &format!("  {}", text))?;
                queue!(out, ResetColor)?;
            }
            ViewRow::GroupHeader { project, server, collapsed, count, .. } => {
                let glyph = if *collapsed { "▶" } else { "▼" };
                let line = if frame.store.single_server() {
                    format!(" {} {} ({})", glyph, project, count)
                } else {
                    format!(" {} {} @ {} ({})", glyph, project, server, count)
                };
                write_section_header(&mut out, &line, selected, palette)?;
            }
            ViewRow::Container(c) => render_container_row(&mut out, frame, c, selected)?,
        }
    }

    // Notifications sit just above the footer
    let note_y = height.saturating_sub(1 + frame.notifications.len());
    queue!(out, cursor::MoveTo(0, note_y as u16))?;
    write_notifications(&mut out, frame.notifications, width, palette)?;

    let help = if frame.search_editing {
        "Type to search | Enter: Done | Esc: Clear"
    } else {
        "q: Quit | ↑/↓: Navigate | /: Search | Tab: Server | 1-5: Sort | g: Group | ←/→: Collapse | S/T/R/D: Start/Stop/Restart/Remove | l: Logs | r: Refresh | e: Export | t: Theme"
    };
    queue!(
        out,
        cursor::MoveTo(1, rows.saturating_sub(1)),
        SetForegroundColor(palette.dim),
        Print(truncate_str(help, width.saturating_sub(1))),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}

fn render_title(out: &mut impl Write, frame: &ContainersFrame, width: usize) -> io::Result<()> {
    let palette = frame.palette;
    let busy = if frame.store.is_busy() { " ⟳ refreshing" } else { "" };
    let left = format!(" dockpeek | {}{}", frame.base_url, busy);
    let pad = width.saturating_sub(left.chars().count() + frame.clock.len() + 1);
    queue!(out, SetBackgroundColor(palette.header_bg), SetForegroundColor(palette.selected_fg), SetAttribute(Attribute::Bold))?;
    write!(out, "{}{}{} ", left, " ".repeat(pad), frame.clock)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    write!(out, "\r\n")
}

fn render_toggles(out: &mut impl Write, frame: &ContainersFrame) -> io::Result<()> {
    let palette = frame.palette;
    let toggles = frame.store.toggles();
    if toggles.is_empty() {
        return writeln(out, "");
    }
    write!(out, "  Servers: ")?;
    let current = &frame.store.filter().server_filter;
    for t in toggles {
        if &t.filter == current {
            queue!(out, SetBackgroundColor(palette.selected_bg), SetForegroundColor(palette.selected_fg))?;
            write!(out, "[{}]", t.label)?;
        } else if !t.enabled {
            queue!(out, SetForegroundColor(palette.dim))?;
            write!(out, " {} (offline) ", t.label)?;
        } else {
            write!(out, " {} ", t.label)?;
        }
        queue!(out, ResetColor)?;
        write!(out, " ")?;
    }
    write!(out, "\r\n")
}

fn render_search_line(out: &mut impl Write, frame: &ContainersFrame) -> io::Result<()> {
    let palette = frame.palette;
    let filter = frame.store.filter();
    if frame.search_editing {
        queue!(out, SetForegroundColor(palette.accent))?;
        write!(out, "  Search: {}_", filter.search_term)?;
        queue!(out, ResetColor)?;
    } else if filter.search_term.is_empty() {
        queue!(out, SetForegroundColor(palette.dim))?;
        write!(out, "  Search: (none)")?;
        queue!(out, ResetColor)?;
    } else {
        write!(out, "  Search: \"{}\"", filter.search_term)?;
    }
    let grouping = if filter.group_by_project { "by project" } else { "off" };
    queue!(out, SetForegroundColor(palette.dim))?;
    write!(
        out,
        "  | Sort: {} {} | Grouping: {}\r\n",
        filter.sort_column.label(),
        filter.sort_direction.arrow(),
        grouping
    )?;
    queue!(out, ResetColor)
}

fn column_label(frame: &ContainersFrame, column: SortColumn) -> String {
    let filter = frame.store.filter();
    if filter.sort_column == column {
        format!("{} {}", column.label().to_uppercase(), filter.sort_direction.arrow())
    } else {
        column.label().to_uppercase()
    }
}

fn render_column_header(out: &mut impl Write, frame: &ContainersFrame) -> io::Result<()> {
    let mut line = format!("  {:<NAME_W$} ", column_label(frame, SortColumn::Name));
    if !frame.store.single_server() {
        line.push_str(&format!("{:<HOST_W$} ", column_label(frame, SortColumn::Server)));
    }
    line.push_str(&format!(
        "{:<IMAGE_W$} {:<STATUS_W$} {:<PORTS_W$} ACTIONS",
        column_label(frame, SortColumn::Image),
        column_label(frame, SortColumn::Status),
        column_label(frame, SortColumn::Ports),
    ));
    queue!(out, SetAttribute(Attribute::Bold))?;
    write!(out, "{}\r\n", line)?;
    queue!(out, SetAttribute(Attribute::Reset))
}

/// One letter per affordance, `·` when disabled.
fn affordances(row: &ContainerRow) -> String {
    if row.removed {
        return "removed".to_string();
    }
    if let Some(action) = row.in_flight {
        return format!("{}...", action.as_str());
    }
    let mut s = String::new();
    for (action, letter) in ContainerAction::ALL.iter().zip(['S', 'T', 'R', 'D']) {
        s.push(if row.is_enabled(*action) { letter } else { '·' });
        s.push(' ');
    }
    s.push(if row.logs_enabled { 'L' } else { '·' });
    s
}

fn render_container_row(out: &mut impl Write, frame: &ContainersFrame, row: &ContainerRow, selected: bool) -> io::Result<()> {
    let palette = frame.palette;
    let mut prefix = format!("  {:<NAME_W$} ", truncate_str(&row.id.name, NAME_W));
    if !frame.store.single_server() {
        prefix.push_str(&format!("{:<HOST_W$} ", truncate_str(&row.id.server, HOST_W)));
    }
    prefix.push_str(&format!("{:<IMAGE_W$} ", truncate_str(&row.image, IMAGE_W)));
    let status = format!("{:<STATUS_W$}", truncate_str(row.status.as_str(), STATUS_W));
    let suffix = format!(
        " {:<PORTS_W$} {}",
        truncate_str(&format_ports(&row.ports), PORTS_W),
        affordances(row)
    );

    if selected || row.removed {
        // Selection and removal styling cover the whole line
        let line = format!("{}{}{}", prefix, status, suffix);
        if row.removed && !selected {
            queue!(out, SetForegroundColor(palette.dim), SetAttribute(Attribute::CrossedOut))?;
            write!(out, "{}\r\n", line)?;
            return queue!(out, ResetColor, SetAttribute(Attribute::Reset));
        }
        return write_selectable(out, &line, true, palette);
    }

    write!(out, "{}", prefix)?;
    queue!(out, SetForegroundColor(palette.status(&row.status)))?;
    write!(out, "{}", status)?;
    queue!(out, ResetColor)?;
    if row.locked {
        queue!(out, SetForegroundColor(palette.dim))?;
    }
    write!(out, "{}\r\n", suffix)?;
    queue!(out, ResetColor)
}
