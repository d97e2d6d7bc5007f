use crossterm::style::Color;

use crate::model::ContainerStatus;
use crate::notifications::Severity;
use crate::settings::Theme;

/// Colors used by every painter for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub running: Color,
    pub exited: Color,
    pub other_status: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
    pub prompt_bg: Color,
    pub prompt_fg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::Reset,
                dim: Color::DarkGrey,
                accent: Color::Cyan,
                selected_bg: Color::DarkGrey,
                selected_fg: Color::White,
                header_bg: Color::DarkBlue,
                running: Color::Green,
                exited: Color::Red,
                other_status: Color::Yellow,
                info: Color::Cyan,
                success: Color::Green,
                error: Color::Red,
                prompt_bg: Color::DarkRed,
                prompt_fg: Color::White,
            },
            Theme::Light => Self {
                text: Color::Black,
                dim: Color::Grey,
                accent: Color::DarkBlue,
                selected_bg: Color::Grey,
                selected_fg: Color::Black,
                header_bg: Color::Blue,
                running: Color::DarkGreen,
                exited: Color::DarkRed,
                other_status: Color::DarkYellow,
                info: Color::DarkBlue,
                success: Color::DarkGreen,
                error: Color::DarkRed,
                prompt_bg: Color::Red,
                prompt_fg: Color::White,
            },
        }
    }

    pub fn status(&self, status: &ContainerStatus) -> Color {
        match status {
            ContainerStatus::Running => self.running,
            ContainerStatus::Exited => self.exited,
            ContainerStatus::Other(_) => self.other_status,
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }
}
