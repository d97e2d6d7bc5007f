use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, queue, style::{SetBackgroundColor, SetForegroundColor, SetAttribute, Attribute, ResetColor}, terminal};

use crate::dispatcher::ConfirmPrompt;
use super::shared::truncate_str;
use super::theme::Palette;

/// Three-line banner above the footer: title, message, key hint.
pub fn render_confirmation(prompt: &ConfirmPrompt, palette: &Palette) -> io::Result<()> {
    let mut out = stdout();
    let size = terminal::size()?;
    let y = size.1.saturating_sub(4);
    let width = size.0 as usize;

    let lines = [
        format!("  {}", prompt.title),
        format!("  {}", prompt.message),
        format!("  y: {} | any other key: Cancel", prompt.confirm_label),
    ];

    queue!(out, SetBackgroundColor(palette.prompt_bg), SetForegroundColor(palette.prompt_fg))?;
    for (i, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, y + i as u16))?;
        if i == 0 {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        write!(out, "{:<width$}", truncate_str(line, width), width = width)?;
        if i == 0 {
            queue!(out, SetAttribute(Attribute::NormalIntensity))?;
        }
    }
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    out.flush()?;
    Ok(())
}
