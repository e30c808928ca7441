//! Text-style commands forwarded to the host.
//!
//! The core neither stores nor inspects styling. Commands are handed to the
//! host's native styling capability unchanged.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 3] = [Self::Bold, Self::Italic, Self::Underline];

    /// Command name understood by the host's native styling API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            _ => None,
        }
    }
}

impl Display for FormatCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host capability that applies a text style to the current selection.
pub trait FormattingHost {
    /// Returns whether the host accepted the command.
    fn apply_text_style(&mut self, command: FormatCommand) -> bool;
}

#[cfg(test)]
mod tests {
    use super::FormatCommand;

    #[test]
    fn command_names_round_trip() {
        for command in FormatCommand::ALL {
            assert_eq!(FormatCommand::parse(command.as_str()), Some(command));
        }
        assert_eq!(FormatCommand::parse("strike"), None);
    }
}
