//! Colored status output

use owo_colors::{OwoColorize, Style};

/// Whether the terminal is under 80 columns. An unknown width counts as wide.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 80)
}

fn paint(text: &str, style: Style) -> String {
    if supports_color::on(supports_color::Stream::Stdout).is_some() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Status colors for messages shown to the operator.
///
/// Color is dropped when stdout does not support it.
pub trait Colorize {
    /// Green, for completed actions.
    fn success(&self) -> String;
    /// Yellow, for actions that went through with a caveat.
    fn warning(&self) -> String;
    /// Red, for refused actions.
    fn error(&self) -> String;
    /// Blue, for headings and ids.
    fn info(&self) -> String;
    /// Dimmed, for no-ops and asides.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().green())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().yellow())
    }

    fn error(&self) -> String {
        paint(self.as_ref(), Style::new().red())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().bright_blue())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}
