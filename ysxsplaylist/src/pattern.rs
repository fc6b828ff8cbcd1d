//! Extraction d'une partie du nom de fichier par expression régulière
//!
//! Two independent rules use this: the track order rule (sort key) and the
//! track name rule (display name). Both follow the same policy:
//!
//! - no pattern: the file name is returned unchanged;
//! - the pattern matches: the first capture group when it is non-empty,
//!   otherwise the whole match;
//! - no match: the file name is returned unchanged.
//!
//! Patterns are always compiled case-insensitively.

use crate::Result;
use regex::{Regex, RegexBuilder};

/// Applies an optional pattern to `name`
///
/// ```
/// use regex::Regex;
/// use ysxsplaylist::pattern::extract;
///
/// let digits = Regex::new(r"(\d+)").unwrap();
/// assert_eq!(extract(Some(&digits), "Episode 7 - Intro.mp3"), "7");
/// assert_eq!(extract(Some(&digits), "Bonus.ogg"), "Bonus.ogg");
/// assert_eq!(extract(None, "Bonus.mp3"), "Bonus.mp3");
/// ```
pub fn extract(pattern: Option<&Regex>, name: &str) -> String {
    let Some(regex) = pattern else {
        return name.to_string();
    };

    match regex.captures(name) {
        Some(captures) => captures
            .get(1)
            .map(|group| group.as_str())
            .filter(|group| !group.is_empty())
            .or_else(|| captures.get(0).map(|whole| whole.as_str()))
            .unwrap_or(name)
            .to_string(),
        None => name.to_string(),
    }
}

/// A compiled, optional extraction rule
#[derive(Debug, Clone, Default)]
pub struct TrackPattern {
    regex: Option<Regex>,
}

impl TrackPattern {
    /// Compiles `pattern`; an empty (or blank) pattern means "no rule"
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Ok(Self::none());
        }
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex: Some(regex) })
    }

    /// The identity rule
    pub fn none() -> Self {
        Self { regex: None }
    }

    pub fn is_set(&self) -> bool {
        self.regex.is_some()
    }

    /// Pattern source, if any
    pub fn as_str(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub fn apply(&self, name: &str) -> String {
        extract(self.regex.as_ref(), name)
    }
}
