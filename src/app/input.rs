use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dispatcher::ContainerAction;
use crate::model::{AppView, LogViewState, SortColumn};
use crate::view::ViewRow;

use super::App;
use super::state::{PendingActionKind, answer_for};

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key(app: &mut App, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    if let Some(pa) = app.pending_action.take() {
        let typed = match code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };
        app.settle_pending(pa.kind, answer_for(typed));
        return Some(InputResult::Consumed);
    }

    match &app.app_view {
        AppView::Containers if app.search_editing => handle_search(app, code),
        AppView::Containers => handle_containers(app, code),
        AppView::ContainerLogs(_) => {
            let editing = app.monitor.log_state.as_ref().is_some_and(|s| s.editing_tail);
            if editing {
                handle_tail_edit(app, code)
            } else {
                handle_logs(app, code)
            }
        }
    }
}

fn selected_row(app: &App) -> Option<&ViewRow> {
    app.rows.get(app.selected_index)
}

fn handle_containers(app: &mut App, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Char('q') => Some(InputResult::Quit),
        KeyCode::Esc => {
            if app.monitor.store.filter().search_term.is_empty() {
                return None;
            }
            app.monitor.update_view(|s| s.set_search(""));
            Some(InputResult::Consumed)
        }
        KeyCode::Up => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
                return Some(InputResult::Consumed);
            }
            None
        }
        KeyCode::Down => {
            if app.selected_index + 1 < app.rows.len() {
                app.selected_index += 1;
                return Some(InputResult::Consumed);
            }
            None
        }
        KeyCode::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(page_size());
            Some(InputResult::Consumed)
        }
        KeyCode::PageDown => {
            let last = app.rows.len().saturating_sub(1);
            app.selected_index = (app.selected_index + page_size()).min(last);
            Some(InputResult::Consumed)
        }
        KeyCode::Home => {
            app.selected_index = 0;
            Some(InputResult::Consumed)
        }
        KeyCode::End => {
            app.selected_index = app.rows.len().saturating_sub(1);
            Some(InputResult::Consumed)
        }
        KeyCode::Char('/') => {
            app.search_editing = true;
            Some(InputResult::Consumed)
        }
        KeyCode::Tab => {
            app.monitor.update_view(|s| s.cycle_server(true));
            Some(InputResult::Consumed)
        }
        KeyCode::BackTab => {
            app.monitor.update_view(|s| s.cycle_server(false));
            Some(InputResult::Consumed)
        }
        KeyCode::Char(c @ '1'..='5') => {
            let column = match c {
                '1' => SortColumn::Name,
                '2' => SortColumn::Server,
                '3' => SortColumn::Image,
                '4' => SortColumn::Status,
                _ => SortColumn::Ports,
            };
            app.monitor.update_view(|s| s.sort_by(column));
            Some(InputResult::Consumed)
        }
        KeyCode::Char('g') => {
            app.monitor.update_view(|s| s.toggle_grouping());
            Some(InputResult::Consumed)
        }
        KeyCode::Char('r') => {
            app.monitor.fetch();
            Some(InputResult::Consumed)
        }
        KeyCode::Char('e') => {
            if let Some(prompt) = app.monitor.request_export(Instant::now()) {
                app.ask(prompt, PendingActionKind::Export);
            }
            Some(InputResult::Consumed)
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            Some(InputResult::Consumed)
        }
        KeyCode::Char('S') => request(app, ContainerAction::Start),
        KeyCode::Char('T') => request(app, ContainerAction::Stop),
        KeyCode::Char('R') => request(app, ContainerAction::Restart),
        KeyCode::Char('D') => request(app, ContainerAction::Remove),
        KeyCode::Char('l') => open_logs(app),
        KeyCode::Right | KeyCode::Left | KeyCode::Enter => {
            match selected_row(app) {
                Some(ViewRow::GroupHeader { key, collapsed, .. }) => {
                    let wants_toggle = match code {
                        KeyCode::Right => *collapsed,
                        KeyCode::Left => !*collapsed,
                        _ => true,
                    };
                    if !wants_toggle {
                        return None;
                    }
                    let key = key.clone();
                    app.monitor.store.toggle_group(&key);
                    Some(InputResult::Consumed)
                }
                Some(ViewRow::Container(_)) if code != KeyCode::Left => open_logs(app),
                _ => None,
            }
        }
        _ => None,
    }
}

fn request(app: &mut App, action: ContainerAction) -> Option<InputResult> {
    let Some(ViewRow::Container(row)) = selected_row(app) else {
        return None;
    };
    let id = row.id.clone();
    if let Some(prompt) = app.monitor.request_action(&id, action) {
        app.ask(prompt, PendingActionKind::Container(id));
    }
    Some(InputResult::Consumed)
}

fn open_logs(app: &mut App) -> Option<InputResult> {
    let Some(ViewRow::Container(row)) = selected_row(app) else {
        return None;
    };
    if !row.logs_enabled {
        return None;
    }
    let id = row.id.clone();
    app.monitor.open_logs(id.clone());
    app.app_view = AppView::ContainerLogs(id);
    Some(InputResult::Consumed)
}

fn handle_search(app: &mut App, code: KeyCode) -> Option<InputResult> {
    let mut term = app.monitor.store.filter().search_term.clone();
    match code {
        KeyCode::Enter => {
            app.search_editing = false;
            return Some(InputResult::Consumed);
        }
        KeyCode::Esc => {
            app.search_editing = false;
            term.clear();
        }
        KeyCode::Backspace => {
            term.pop();
        }
        KeyCode::Char(c) => term.push(c),
        _ => return None,
    }
    app.monitor.update_view(|s| s.set_search(&term));
    app.selected_index = 0;
    Some(InputResult::Consumed)
}

fn page_size() -> usize {
    crossterm::terminal::size()
        .map(|(_, h)| h.saturating_sub(6) as usize)
        .unwrap_or(20)
        .max(1)
}

fn handle_logs(app: &mut App, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Left => {
            app.monitor.close_logs();
            app.app_view = AppView::Containers;
            Some(InputResult::Consumed)
        }
        KeyCode::Char('r') => {
            app.monitor.load_logs();
            Some(InputResult::Consumed)
        }
        KeyCode::Char('c') => {
            app.monitor.copy_logs(Instant::now());
            Some(InputResult::Consumed)
        }
        KeyCode::Char('t') => {
            let log_state = app.monitor.log_state.as_mut()?;
            log_state.editing_tail = true;
            Some(InputResult::Consumed)
        }
        KeyCode::Up => scroll(app, 1, true),
        KeyCode::PageUp => scroll(app, page_size(), true),
        KeyCode::Down => scroll(app, 1, false),
        KeyCode::PageDown => scroll(app, page_size(), false),
        KeyCode::Char('f') | KeyCode::End => {
            let log_state = app.monitor.log_state.as_mut()?;
            log_state.auto_follow = true;
            log_state.scroll_offset = 0;
            Some(InputResult::Consumed)
        }
        _ => None,
    }
}

/// Scrolling up pauses follow; reaching the bottom resumes it.
fn scroll(app: &mut App, by: usize, up: bool) -> Option<InputResult> {
    let log_state = app.monitor.log_state.as_mut()?;
    scroll_log(log_state, by, up);
    Some(InputResult::Consumed)
}

pub(crate) fn scroll_log(log_state: &mut LogViewState, by: usize, up: bool) {
    if up {
        log_state.auto_follow = false;
        let max_offset = log_state.lines.len().saturating_sub(1);
        log_state.scroll_offset = (log_state.scroll_offset + by).min(max_offset);
    } else if log_state.scroll_offset > by {
        log_state.scroll_offset -= by;
    } else {
        log_state.scroll_offset = 0;
        log_state.auto_follow = true;
    }
}

fn handle_tail_edit(app: &mut App, code: KeyCode) -> Option<InputResult> {
    let log_state = app.monitor.log_state.as_mut()?;
    match code {
        KeyCode::Enter => {
            log_state.editing_tail = false;
            app.monitor.load_logs();
        }
        KeyCode::Esc => log_state.editing_tail = false,
        KeyCode::Backspace => {
            log_state.tail_input.pop();
        }
        KeyCode::Char(c) if log_state.tail_input.len() < 8 => log_state.tail_input.push(c),
        _ => return None,
    }
    Some(InputResult::Consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowId;

    #[test]
    fn scrolling_pauses_and_resumes_follow() {
        let mut s = LogViewState::new(RowId::new("h1", "web"), 200);
        s.lines.extend((0..10).map(|i| i.to_string()));

        scroll_log(&mut s, 3, true);
        assert!(!s.auto_follow);
        assert_eq!(s.scroll_offset, 3);

        scroll_log(&mut s, 50, true);
        assert_eq!(s.scroll_offset, 9);

        scroll_log(&mut s, 9, false);
        assert!(s.auto_follow);
        assert_eq!(s.scroll_offset, 0);
    }
}
