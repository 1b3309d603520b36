//! Terminal capability detection and colouring.

use owo_colors::{OwoColorize, Style, colors::css};

/// Detects whether coloured output should be enabled.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(width, _)| width.0)
}

/// Whether the terminal is narrower than 60 columns.
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|width| width < 60)
}

fn paint(text: &str, style: Style) -> String {
    if supports_color() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Extension trait for colouring output.
pub trait Colorize {
    /// Success (green).
    fn success(&self) -> String;
    /// Warning (amber).
    fn warning(&self) -> String;
    /// Informational (blue).
    fn info(&self) -> String;
    /// Dimmed.
    fn dim(&self) -> String;
    /// Bold.
    fn strong(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Green>())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Orange>())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::LightBlue>())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }

    fn strong(&self) -> String {
        paint(self.as_ref(), Style::new().bold())
    }
}
