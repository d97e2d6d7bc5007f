use std::io::{self, Write};
use crossterm::{queue, style::{SetForegroundColor, SetBackgroundColor, ResetColor, Attribute, SetAttribute}};

use crate::model::PortMapping;
use crate::notifications::Notification;
use super::theme::Palette;

/// Truncate a string to at most `max_len` characters (not bytes), appending "..."
/// if truncated. Safe for multi-byte UTF-8.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

/// Truncate a string to at most `max_len` bytes, backing off to the last
/// char boundary.
pub fn safe_truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `host:container` pairs, comma separated. Empty becomes "-".
pub fn format_ports(ports: &[PortMapping]) -> String {
    if ports.is_empty() {
        return "-".to_string();
    }
    ports
        .iter()
        .map(|p| format!("{}:{}", p.host_port, p.container_port))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn writeln(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{}\r\n", text)
}

pub fn write_section_header(out: &mut impl Write, text: &str, selected: bool, palette: &Palette) -> io::Result<()> {
    if selected {
        queue!(out, SetBackgroundColor(palette.header_bg), SetForegroundColor(palette.selected_fg))?;
    } else {
        queue!(out, SetAttribute(Attribute::Bold), SetForegroundColor(palette.accent))?;
    }
    write!(out, "{}\r\n", text)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}

pub fn write_selectable(out: &mut impl Write, text: &str, selected: bool, palette: &Palette) -> io::Result<()> {
    if selected {
        queue!(out, SetBackgroundColor(palette.selected_bg), SetForegroundColor(palette.selected_fg))?;
    }
    write!(out, "{}\r\n", text)?;
    if selected {
        queue!(out, ResetColor)?;
    }
    Ok(())
}

/// Stacked notifications, newest last.
pub fn write_notifications(out: &mut impl Write, notifications: &[Notification], width: usize, palette: &Palette) -> io::Result<()> {
    for n in notifications {
        queue!(out, SetForegroundColor(palette.severity(n.severity)), SetAttribute(Attribute::Bold))?;
        write!(out, "  {}\r\n", truncate_str(&n.message, width.saturating_sub(4)))?;
        queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_utf8() {
        assert_eq!(truncate_str("café", 4), "café");
        assert_eq!(truncate_str("日本語", 3), "日本語");
        assert_eq!(truncate_str("hello世界", 6), "hel..."); // 7 chars, keep=3
    }

    #[test]
    fn safe_truncate_utf8_boundary() {
        // "é" is two bytes; cutting at 3 lands on its first byte
        let s = "café";
        assert_eq!(safe_truncate(s, 3), "caf");
        assert_eq!(safe_truncate(s, 5), "café");
    }

    #[test]
    fn ports_render_as_pairs() {
        let ports = vec![
            PortMapping { host_port: "8080".into(), container_port: "80/tcp".into(), link: String::new() },
            PortMapping { host_port: "5353".into(), container_port: "53/udp".into(), link: String::new() },
        ];
        assert_eq!(format_ports(&ports), "8080:80/tcp, 5353:53/udp");
        assert_eq!(format_ports(&[]), "-");
    }
}
