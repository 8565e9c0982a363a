//! Styled console output for the catalog commands.
//!
//! Messages carry a [`Tone`] saying what they report. Colour is only added
//! when stdout supports it.

use std::fmt;

use owo_colors::{colors::css, OwoColorize};
use supports_color::Stream;

/// Below this many columns the status table is replaced by plain lines.
const NARROW_COLUMNS: u16 = 40;

/// What a line of output reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A catalog change that was carried out.
    Success,
    /// A rejected operation, or something needing attention.
    Warning,
    /// A screen or section title.
    Heading,
    /// Hints and empty-list notices.
    Muted,
}

impl Tone {
    /// Styles `text` in this tone.
    pub fn paint(self, text: impl fmt::Display) -> String {
        if supports_color::on_cached(Stream::Stdout).is_none() {
            return text.to_string();
        }
        match self {
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Warning => text.fg::<css::Orange>().to_string(),
            Self::Heading => text.fg::<css::LightBlue>().bold().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

/// Prints one line in the given tone.
pub fn say(tone: Tone, text: impl fmt::Display) {
    println!("{}", tone.paint(text));
}

/// Whether the terminal is too narrow for the status table.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painting_keeps_the_text() {
        for tone in [Tone::Success, Tone::Warning, Tone::Heading, Tone::Muted] {
            assert!(tone.paint("Library ID: L1").contains("Library ID: L1"));
        }
    }
}
