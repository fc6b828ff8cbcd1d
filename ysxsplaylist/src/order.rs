//! Clés de tri des pistes
//!
//! The order key of a track is whatever the track order rule extracts from
//! its file name. Keys that both read as numbers are compared numerically,
//! everything else uses a natural collation where digit runs compare by
//! value ("track2" < "track10") and letters compare case-insensitively.
//!
//! A numeric key sorts before a text key, so that the comparison stays a
//! total order even on mixed input.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Sort key extracted from a file name
#[derive(Debug, Clone)]
pub enum OrderKey {
    Number(f64),
    Text(String),
}

impl OrderKey {
    /// Builds the key of an already extracted value
    ///
    /// ```
    /// use ysxsplaylist::order::OrderKey;
    ///
    /// assert!(matches!(OrderKey::parse(" 12 "), OrderKey::Number(n) if n == 12.0));
    /// assert!(matches!(OrderKey::parse("12a"), OrderKey::Text(_)));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match parse_number(raw) {
            Some(number) => Self::Number(number),
            None => Self::Text(raw.to_string()),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => natural_cmp(a, b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// Compares two extracted values the way the track list is sorted
pub fn compare(a: &str, b: &str) -> Ordering {
    OrderKey::parse(a).cmp(&OrderKey::parse(b))
}

/// Blank strings and NaN are not numbers
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Natural collation of two strings
///
/// Strings that only differ by the zero padding of their numbers or by
/// letter case are finally ordered by their raw content, so that the result
/// is `Equal` only for identical strings.
///
/// ```
/// use std::cmp::Ordering;
/// use ysxsplaylist::order::natural_cmp;
///
/// assert_eq!(natural_cmp("track2", "track10"), Ordering::Less);
/// assert_eq!(natural_cmp("Chapter B", "chapter a"), Ordering::Greater);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    collate(a, b).then_with(|| a.cmp(b))
}

fn collate(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (l, r) = match (left.peek(), right.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&l), Some(&r)) => (l, r),
        };

        let ordering = if l.is_ascii_digit() && r.is_ascii_digit() {
            let left_run = take_digits(&mut left);
            let right_run = take_digits(&mut right);
            compare_digit_runs(&left_run, &right_run)
        } else {
            left.next();
            right.next();
            l.to_lowercase().cmp(r.to_lowercase())
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Compares digit runs by value without overflowing on long runs
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
