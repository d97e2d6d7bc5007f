use std::io;

use chrono::Local;

use crate::model::AppView;
use crate::view::{ContainersFrame, Presenter, build_view};

use super::App;
use super::state::clamp_selection;

pub fn render(app: &mut App) -> io::Result<()> {
    let palette = app.palette();

    match &app.app_view {
        AppView::Containers => {
            app.rows = build_view(&app.monitor.store, &app.monitor.dispatcher);
            app.selected_index = clamp_selection(app.selected_index, &app.rows);
            let clock = Local::now().format("%H:%M:%S").to_string();
            Presenter::render_containers(&ContainersFrame {
                store: &app.monitor.store,
                rows: &app.rows,
                selected: app.selected_index,
                notifications: app.monitor.notifications.visible(),
                search_editing: app.search_editing,
                base_url: &app.monitor.config().base_url,
                clock: &clock,
                palette: &palette,
            })?;
        }
        AppView::ContainerLogs(_) => {
            if let Some(ref log_state) = app.monitor.log_state {
                Presenter::render_logs(log_state, app.monitor.notifications.visible(), &palette)?;
            }
        }
    }

    if let Some(ref pa) = app.pending_action {
        Presenter::render_confirmation(&pa.prompt, &palette)?;
    }
    Ok(())
}
