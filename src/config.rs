use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::model::DEFAULT_TAIL;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);
pub const REFRESH_AFTER_ACTION: Duration = Duration::from_secs(1);
pub const ACTION_COOLDOWN: Duration = Duration::from_millis(500);
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal dashboard for a multi-host container inventory service.
#[derive(Parser, Debug)]
#[command(name = "dockpeek", version, about)]
pub struct Args {
    /// Base URL of the inventory service
    #[arg(long, env = "DOCKPEEK_URL", default_value = "http://localhost:3420")]
    pub url: String,

    /// Initial number of log lines requested by the logs viewer
    #[arg(long, default_value_t = DEFAULT_TAIL)]
    pub tail: u32,

    /// Directory that receives exported JSON files
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Write diagnostic logs to this file (stdout belongs to the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub default_tail: u32,
    pub export_dir: PathBuf,
    pub settings_path: Option<PathBuf>,
    pub notification_ttl: Duration,
    pub refresh_after_action: Duration,
    pub action_cooldown: Duration,
    pub confirm_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_tail: DEFAULT_TAIL,
            export_dir: PathBuf::from("."),
            settings_path: None,
            notification_ttl: NOTIFICATION_TTL,
            refresh_after_action: REFRESH_AFTER_ACTION,
            action_cooldown: ACTION_COOLDOWN,
            confirm_timeout: CONFIRM_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let tail = if args.tail == 0 { DEFAULT_TAIL } else { args.tail };
        Self {
            default_tail: tail,
            export_dir: args.export_dir,
            settings_path: args.settings,
            ..Self::new(args.url)
        }
    }
}
