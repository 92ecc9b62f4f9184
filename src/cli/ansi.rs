//! ANSI escape formatting
//!
//! A closed set of style tokens. Color and weight tokens are SGR codes
//! (`ESC[<n>m`); cursor and screen tokens are raw control sequences
//! (`ESC[<body>`). Both compose through the same [`format`] envelope,
//! which always ends with a reset plus normal weight.

use std::fmt;
use std::str::FromStr;

use crate::error::ReporterError;

/// A named terminal style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Reset all attributes
    Reset,
    /// Bold weight
    Bold,
    /// Normal weight
    Normal,
    /// Red foreground
    Red,
    /// Green foreground
    Green,
    /// Yellow foreground
    Yellow,
    /// Move the cursor to the first row
    CursorReset,
    /// Erase the whole display
    DisplayErase,
}

/// The body of an escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Select Graphic Rendition parameter, emitted with an `m` suffix
    Sgr(u8),
    /// Control sequence body, emitted verbatim
    Control(&'static str),
}

impl Style {
    /// The escape-sequence body for this style
    #[must_use]
    pub const fn code(self) -> Code {
        match self {
            Self::Reset => Code::Sgr(0),
            Self::Bold => Code::Sgr(1),
            Self::Normal => Code::Sgr(22),
            Self::Red => Code::Sgr(31),
            Self::Green => Code::Sgr(32),
            Self::Yellow => Code::Sgr(33),
            Self::CursorReset => Code::Control("1d"),
            Self::DisplayErase => Code::Control("2J"),
        }
    }

    /// The full escape sequence for this style
    #[must_use]
    pub fn escape(self) -> String {
        self.code().to_string()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sgr(n) => write!(f, "\x1b[{n}m"),
            Self::Control(body) => write!(f, "\x1b[{body}"),
        }
    }
}

impl FromStr for Style {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(Self::Reset),
            "bold" => Ok(Self::Bold),
            "normal" | "normal_color" => Ok(Self::Normal),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "cursor_reset" => Ok(Self::CursorReset),
            "display_erase" => Ok(Self::DisplayErase),
            other => Err(ReporterError::UnknownStyle(other.to_string())),
        }
    }
}

/// Sequence appended after every formatted span
#[must_use]
pub fn closing() -> String {
    format!("{}{}", Style::Reset.escape(), Style::Normal.escape())
}

/// Build a function that wraps text in the given styles.
///
/// Calling it with an empty string yields just the envelope, which is how
/// standalone control sequences (screen clear) are emitted.
pub fn format(styles: &[Style]) -> impl Fn(&str) -> String {
    let opening: String = styles.iter().map(|s| s.escape()).collect();
    let closing = closing();
    move |text: &str| format!("{opening}{text}{closing}")
}

/// Wrap `text` in `styles` in one call
#[must_use]
pub fn paint(styles: &[Style], text: &str) -> String {
    format(styles)(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgr_escape() {
        assert_eq!(Style::Bold.escape(), "\x1b[1m");
        assert_eq!(Style::Red.escape(), "\x1b[31m");
        assert_eq!(Style::Normal.escape(), "\x1b[22m");
    }

    #[test]
    fn test_control_escape_has_no_m_suffix() {
        assert_eq!(Style::CursorReset.escape(), "\x1b[1d");
        assert_eq!(Style::DisplayErase.escape(), "\x1b[2J");
    }

    #[test]
    fn test_format_wraps_text() {
        let bold_red = format(&[Style::Bold, Style::Red]);
        assert_eq!(bold_red("fail"), "\x1b[1m\x1b[31mfail\x1b[0m\x1b[22m");
    }

    #[test]
    fn test_format_empty_text_is_envelope_only() {
        let clear = format(&[Style::CursorReset, Style::DisplayErase]);
        assert_eq!(clear(""), "\x1b[1d\x1b[2J\x1b[0m\x1b[22m");
    }

    #[test]
    fn test_format_no_styles_still_resets() {
        assert_eq!(paint(&[], "plain"), "plain\x1b[0m\x1b[22m");
    }

    #[test]
    fn test_formatter_is_reusable() {
        let green = format(&[Style::Green]);
        assert_eq!(green("a"), green("a"));
        assert_ne!(green("a"), green("b"));
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("bold".parse::<Style>().unwrap(), Style::Bold);
        assert_eq!("display_erase".parse::<Style>().unwrap(), Style::DisplayErase);
        assert_eq!("normal_color".parse::<Style>().unwrap(), Style::Normal);
    }

    #[test]
    fn test_unknown_style_is_error() {
        let err = "blink".parse::<Style>().unwrap_err();
        assert!(matches!(err, ReporterError::UnknownStyle(name) if name == "blink"));
    }
}
