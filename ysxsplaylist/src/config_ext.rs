//! Extension pour lire la configuration d'album depuis ysxsconfig
//!
//! Ce module fournit le trait `AlbumConfigExt` qui ajoute à
//! `ysxsconfig::Config` la lecture des options d'album, des options du
//! lecteur et du répertoire des enregistrements de lecture.
//!
//! # Exemple
//!
//! ```no_run
//! use ysxsconfig::get_config;
//! use ysxsplaylist::AlbumConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! let options = config.album_options();
//! println!("Album {} on {}", options.album_path, options.alist_url);
//! println!("Records in {}", config.records_dir()?.display());
//! # Ok(())
//! # }
//! ```

use crate::options::{AlbumOptions, PlayerOptions, DEFAULT_TRACK_PATH};
use anyhow::Result;
use std::path::PathBuf;
use ysxsconfig::Config;

/// Default directory of the playback records, relative to the config dir
pub const DEFAULT_RECORDS_DIR: &str = "records";

/// Trait d'extension pour la configuration d'album
pub trait AlbumConfigExt {
    /// Options of the configured album (section `album`)
    fn album_options(&self) -> AlbumOptions;

    /// Presentation flags (section `player`)
    fn player_options(&self) -> PlayerOptions;

    /// Directory of the playback records, created if needed
    fn records_dir(&self) -> Result<PathBuf>;
}

impl AlbumConfigExt for Config {
    fn album_options(&self) -> AlbumOptions {
        let album = |key: &str, default: &str| self.get_string(&["album", key], default);

        AlbumOptions {
            alist_url: self.alist_url(),
            album_path: album("album_path", ""),
            album_password: album("album_password", ""),
            track_path: album("track_path", DEFAULT_TRACK_PATH),
            track_order: album("track_order", ""),
            track_name: album("track_name", ""),
            artist_name: album("artist_name", ""),
            cover_path: album("cover_path", ""),
            album_name: album("album_name", ""),
        }
    }

    fn player_options(&self) -> PlayerOptions {
        let defaults = PlayerOptions::default();
        let flag = |key: &str, default: bool| self.get_bool(&["player", key], default);

        PlayerOptions {
            fixed: flag("fixed", defaults.fixed),
            list_folded: flag("list_folded", defaults.list_folded),
            list_max_height: self.get_string(
                &["player", "list_max_height"],
                &defaults.list_max_height,
            ),
        }
    }

    fn records_dir(&self) -> Result<PathBuf> {
        self.managed_dir(&["records", "directory"], DEFAULT_RECORDS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load(yaml: &str) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), yaml).unwrap();
        let config = Config::load(Some(dir.path())).unwrap();
        (dir, config)
    }

    #[test]
    fn test_album_options_from_yaml() {
        let (_dir, config) = load(
            r#"
alist:
  url: "https://pan.example.org/"
album:
  album_path: "/books/three-body"
  album_password: 1234
  track_path: "/track|/bonus"
  track_order: '(\d+)'
  album_name: "三体"
"#,
        );

        let options = config.album_options();
        assert_eq!(options.alist_url, "https://pan.example.org/");
        assert_eq!(options.album_path, "/books/three-body");
        assert_eq!(options.album_password, "1234");
        assert_eq!(options.track_directories(), vec!["/track", "/bonus"]);
        assert_eq!(options.track_order, r"(\d+)");
        assert_eq!(options.album_name, "三体");
        assert_eq!(options.artist_name, "");
    }

    #[test]
    fn test_default_album_options() {
        let (_dir, config) = load("{}");
        let options = config.album_options();
        assert_eq!(options.track_path, DEFAULT_TRACK_PATH);
        assert!(options.album_path().is_err());
    }

    #[test]
    fn test_player_options() {
        let (_dir, config) = load("player:\n  fixed: true\n  list_max_height: 500px\n");
        let options = config.player_options();
        assert!(options.fixed);
        assert!(!options.list_folded);
        assert_eq!(options.list_max_height, "500px");
    }

    #[test]
    fn test_records_dir_is_created() {
        let (dir, config) = load("{}");
        let records = config.records_dir().unwrap();
        assert_eq!(records, dir.path().join(DEFAULT_RECORDS_DIR));
        assert!(records.is_dir());
    }
}
