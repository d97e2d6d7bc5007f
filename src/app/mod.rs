mod state;
mod event_loop;
mod render;
mod input;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};
use tracing::{info, warn};

use crate::config::Config;
use crate::dashboard_controller::DashboardMonitor;
use crate::dispatcher::ConfirmPrompt;
use crate::model::AppView;
use crate::settings::{Settings, SettingsStore, Theme};
use crate::view::{Palette, Presenter, ViewRow};

pub use input::{InputResult, handle_key};
pub use state::{PendingAction, PendingActionKind, answer_for, clamp_selection};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Main application state and event loop.
pub struct App {
    pub monitor: DashboardMonitor,
    pub settings: SettingsStore,
    pub theme: Theme,
    pub app_view: AppView,
    pub rows: Vec<ViewRow>,
    pub selected_index: usize,
    pub search_editing: bool,
    pub pending_action: Option<PendingAction>,
    pub last_tick: Instant,
    pub tick_rate: Duration,
}

impl App {
    pub fn new(rt: Arc<tokio::runtime::Runtime>, config: Config) -> Self {
        let settings = SettingsStore::new(config.settings_path.clone());
        let theme = settings.load().theme;
        let tick_rate = Duration::from_secs(1);

        Self {
            monitor: DashboardMonitor::new(rt, config),
            settings,
            theme,
            app_view: AppView::Containers,
            rows: Vec::new(),
            selected_index: 0,
            search_editing: false,
            pending_action: None,
            last_tick: Instant::now() - tick_rate,
            tick_rate,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.settings.save(&Settings { theme: self.theme }) {
            warn!(error = %e, "could not remember theme");
        }
    }

    /// Show a confirmation banner for `kind`.
    pub fn ask(&mut self, prompt: ConfirmPrompt, kind: PendingActionKind) {
        self.pending_action = Some(PendingAction {
            prompt,
            kind,
            expires: Instant::now() + self.monitor.config().confirm_timeout,
        });
    }
}

/// Run the application. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(config: Config, should_quit: Arc<AtomicBool>) -> io::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;

    info!(url = %config.base_url, "starting dashboard");
    let mut app = App::new(Arc::clone(&rt), config);
    app.monitor.fetch();

    let result = main_loop(&mut app, &should_quit);
    restore_terminal();
    info!("dashboard stopped");
    result
}

fn main_loop(app: &mut App, should_quit: &AtomicBool) -> io::Result<()> {
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            return Ok(());
        }

        let now = Instant::now();

        if app.expire_pending_action() {
            needs_render = true;
        }
        if app.poll_backend() {
            needs_render = true;
        }
        if app.advance_timers() {
            needs_render = true;
        }
        if app.process_tick() {
            needs_render = true;
        }

        if needs_render {
            if Presenter::render_size_guard(&app.palette())? {
                needs_render = false;
                if crossterm::event::poll(Duration::from_millis(100))? {
                    let _ = crossterm::event::read()?;
                }
                continue;
            }

            render::render(app)?;
            needs_render = false;
        }

        let timeout = app.tick_rate.saturating_sub(now.elapsed());
        if crossterm::event::poll(timeout.min(Duration::from_millis(100)))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key_event) => match input::handle_key(app, key_event) {
                    Some(InputResult::Quit) => return Ok(()),
                    Some(InputResult::Consumed) => needs_render = true,
                    None => {}
                },
                crossterm::event::Event::Resize(_, _) => needs_render = true,
                _ => {}
            }
        }
    }
}
