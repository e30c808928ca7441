//! Checklist trigger detection.
//!
//! Only the tail of the current free-text content is inspected, so the check
//! costs the same regardless of how much text precedes the token.

/// Browsers report a trailing space typed into editable content as U+00A0.
const NO_BREAK_SPACE: char = '\u{a0}';

/// A trigger token found at the end of free-text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Byte length of the content that precedes the token.
    pub prefix_len: usize,
}

impl TriggerMatch {
    /// Content with the token removed.
    pub fn prefix<'a>(&self, content: &'a str) -> &'a str {
        &content[..self.prefix_len]
    }
}

/// Suffix matcher for the configured trigger token.
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    token: String,
}

impl TriggerDetector {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Checks whether `content` ends with the trigger token.
    ///
    /// Always `None` while list mode is active. A final no-break space in
    /// `content` stands in for a final ASCII space in the token.
    pub fn detect(&self, content: &str, list_active: bool) -> Option<TriggerMatch> {
        if list_active || self.token.is_empty() {
            return None;
        }
        if let Some(prefix) = content.strip_suffix(self.token.as_str()) {
            return Some(TriggerMatch {
                prefix_len: prefix.len(),
            });
        }

        let token_head = self.token.strip_suffix(' ')?;
        let prefix = content
            .strip_suffix(NO_BREAK_SPACE)?
            .strip_suffix(token_head)?;
        Some(TriggerMatch {
            prefix_len: prefix.len(),
        })
    }
}
