//! Paramètres d'un album et identité de persistance

use crate::pattern::TrackPattern;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use ysxsalist::path;

/// Track directory used when none is configured
pub const DEFAULT_TRACK_PATH: &str = "/track";

/// Separator of the configured track directories
pub const TRACK_PATH_DELIMITER: char = '|';

/// Album-level settings of one player instance
///
/// Every field is a plain string so that options can be read from a
/// configuration file or from element attributes without conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumOptions {
    /// Base URL of the AList server
    pub alist_url: String,
    /// Album directory on the server
    pub album_path: String,
    pub album_password: String,
    /// Pipe-delimited track directories, relative to the album
    pub track_path: String,
    /// Pattern extracting the sort key from a file name
    pub track_order: String,
    /// Pattern extracting the display name from a file name
    pub track_name: String,
    pub artist_name: String,
    /// Cover image, relative to the album
    pub cover_path: String,
    pub album_name: String,
}

impl AlbumOptions {
    pub fn new(alist_url: impl Into<String>, album_path: impl Into<String>) -> Self {
        Self {
            alist_url: alist_url.into(),
            album_path: album_path.into(),
            ..Self::default()
        }
    }

    /// Normalised album path, absolute and without trailing separator
    ///
    /// Fails when no album path is configured.
    pub fn album_path(&self) -> Result<String> {
        let raw = self.album_path.trim();
        if raw.is_empty() {
            return Err(Error::configuration("album path is not set"));
        }
        Ok(path::absolute(raw))
    }

    /// Configured track directories, in declaration order
    ///
    /// An empty segment stands for the album directory itself.
    ///
    /// ```
    /// use ysxsplaylist::AlbumOptions;
    ///
    /// let mut options = AlbumOptions::default();
    /// assert_eq!(options.track_directories(), vec!["/track"]);
    ///
    /// options.track_path = "/track | /bonus".to_string();
    /// assert_eq!(options.track_directories(), vec!["/track", "/bonus"]);
    /// ```
    pub fn track_directories(&self) -> Vec<String> {
        let raw = if self.track_path.trim().is_empty() {
            DEFAULT_TRACK_PATH
        } else {
            self.track_path.as_str()
        };

        raw.split(TRACK_PATH_DELIMITER)
            .map(|directory| directory.trim().to_string())
            .collect()
    }

    pub fn order_pattern(&self) -> Result<TrackPattern> {
        TrackPattern::new(&self.track_order)
    }

    pub fn name_pattern(&self) -> Result<TrackPattern> {
        TrackPattern::new(&self.track_name)
    }

    pub fn has_cover(&self) -> bool {
        !self.cover_path.trim().is_empty()
    }

    pub fn identity(&self) -> Result<AlbumIdentity> {
        Ok(AlbumIdentity::new(&self.alist_url, &self.album_path()?))
    }

    /// Checks everything that can be checked without the network
    pub fn validate(&self) -> Result<()> {
        self.album_path()?;
        self.order_pattern()?;
        self.name_pattern()?;
        Ok(())
    }
}

/// Presentation flags, handed to the player untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    /// Player docked at the bottom of the page
    pub fixed: bool,
    pub list_folded: bool,
    /// CSS height of the track list
    pub list_max_height: String,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            fixed: false,
            list_folded: false,
            list_max_height: "300px".to_string(),
        }
    }
}

/// Key of an album in the playback records
///
/// Built from the server base URL and the album path, so that the same album
/// maps to the same key whatever the separators around both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumIdentity(String);

impl AlbumIdentity {
    /// ```
    /// use ysxsplaylist::AlbumIdentity;
    ///
    /// let a = AlbumIdentity::new("http://pan.example.org/", "books/three-body/");
    /// let b = AlbumIdentity::new("http://pan.example.org", "/books/three-body");
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "http://pan.example.org/books/three-body");
    /// ```
    pub fn new(server_base_url: &str, album_path: &str) -> Self {
        let base = path::remove_end(server_base_url.trim(), path::SEPARATOR);
        Self(format!("{}{}", base, path::absolute(album_path.trim())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlbumIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AlbumIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_path_is_required() {
        let options = AlbumOptions::new("http://pan.example.org", "   ");
        assert!(matches!(options.album_path(), Err(Error::Configuration(_))));
        assert!(matches!(options.identity(), Err(Error::Configuration(_))));
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_album_path_normalisation() {
        let options = AlbumOptions::new("http://pan.example.org", "books/sanguo/");
        assert_eq!(options.album_path().unwrap(), "/books/sanguo");

        let root = AlbumOptions::new("http://pan.example.org", "/");
        assert_eq!(root.album_path().unwrap(), "/");
    }

    #[test]
    fn test_track_directories_split() {
        let mut options = AlbumOptions::default();
        options.track_path = "/track|/bonus|".to_string();
        assert_eq!(options.track_directories(), vec!["/track", "/bonus", ""]);
    }

    #[test]
    fn test_identity_variants_converge() {
        let variants = [
            ("http://pan.example.org", "/books/sanguo"),
            ("http://pan.example.org/", "/books/sanguo/"),
            ("http://pan.example.org", "books/sanguo"),
        ];
        let expected = AlbumIdentity::new(variants[0].0, variants[0].1);
        for (url, album) in variants {
            assert_eq!(AlbumIdentity::new(url, album), expected);
        }
        assert_eq!(expected.to_string(), "http://pan.example.org/books/sanguo");
    }

    #[test]
    fn test_identity_differs_per_server() {
        assert_ne!(
            AlbumIdentity::new("http://a.example.org", "/album"),
            AlbumIdentity::new("http://b.example.org", "/album")
        );
    }

    #[test]
    fn test_validate_rejects_bad_patterns() {
        let mut options = AlbumOptions::new("http://pan.example.org", "/album");
        options.track_order = "(\\d+".to_string();
        assert!(matches!(options.validate(), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_player_options_defaults() {
        let options: PlayerOptions = serde_json::from_str(r#"{"fixed": true}"#).unwrap();
        assert!(options.fixed);
        assert!(!options.list_folded);
        assert_eq!(options.list_max_height, "300px");
    }
}
