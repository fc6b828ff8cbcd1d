//! Éléments audio remis au lecteur

use crate::options::AlbumOptions;
use crate::pattern::TrackPattern;
use serde::{Deserialize, Serialize};
use ysxsalist::{path, DirectoryEntry, DirectoryService};

/// One playable unit, in the shape the player widget consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioItem {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub cover: String,
}

/// Display name of a track
///
/// The album name and the extracted track name joined by one space. When the
/// name rule extracts nothing, the file name is used.
pub fn display_name(album_name: &str, pattern: &TrackPattern, file_name: &str) -> String {
    let extracted = pattern.apply(file_name);
    let track_name = if extracted.is_empty() {
        file_name
    } else {
        extracted.as_str()
    };

    if album_name.is_empty() {
        track_name.to_string()
    } else {
        format!("{} {}", album_name, track_name)
    }
}

/// Turns sorted directory entries into audio items
pub struct AudioListBuilder<'a> {
    service: &'a dyn DirectoryService,
    album_path: String,
    album_name: &'a str,
    artist: &'a str,
    name_pattern: TrackPattern,
    cover: String,
}

impl<'a> AudioListBuilder<'a> {
    pub fn new(
        service: &'a dyn DirectoryService,
        options: &'a AlbumOptions,
        name_pattern: TrackPattern,
    ) -> crate::Result<Self> {
        Ok(Self {
            service,
            album_path: options.album_path()?,
            album_name: options.album_name.trim(),
            artist: options.artist_name.as_str(),
            name_pattern,
            cover: String::new(),
        })
    }

    /// Cover URL shared by every item
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    pub fn item(&self, entry: &DirectoryEntry) -> AudioItem {
        let directory = path::join(&self.album_path, &entry.source_directory);
        AudioItem {
            name: display_name(self.album_name, &self.name_pattern, &entry.name),
            artist: self.artist.to_string(),
            url: self
                .service
                .download_url(&directory, &entry.name, entry.signature()),
            cover: self.cover.clone(),
        }
    }

    pub fn build(&self, entries: &[DirectoryEntry]) -> Vec<AudioItem> {
        entries.iter().map(|entry| self.item(entry)).collect()
    }
}
