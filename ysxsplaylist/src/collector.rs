//! Collecte des pistes d'un album
//!
//! Every configured track directory is listed concurrently. The listings are
//! concatenated in configuration order, directories are dropped, and the
//! result is stably sorted on the order key. A single failed listing fails
//! the whole collection: no partial list is ever returned.

use crate::order::OrderKey;
use crate::pattern::TrackPattern;
use crate::options::AlbumOptions;
use crate::Result;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};
use ysxsalist::{path, DirectoryEntry, DirectoryService};

/// Page number sent with every listing
const FIRST_PAGE: u32 = 1;

/// `per_page = 0` asks AList for the whole directory
const ALL_ENTRIES: u32 = 0;

/// Gathers and orders the tracks of one album
pub struct TrackCollector {
    service: Arc<dyn DirectoryService>,
    album_path: String,
    password: String,
    directories: Vec<String>,
    order: TrackPattern,
}

impl TrackCollector {
    pub fn new(
        service: Arc<dyn DirectoryService>,
        album_path: impl Into<String>,
        password: impl Into<String>,
        directories: Vec<String>,
        order: TrackPattern,
    ) -> Self {
        Self {
            service,
            album_path: path::absolute(&album_path.into()),
            password: password.into(),
            directories,
            order,
        }
    }

    /// Collector for the album described by `options`
    pub fn from_options(
        service: Arc<dyn DirectoryService>,
        options: &AlbumOptions,
    ) -> Result<Self> {
        Ok(Self::new(
            service,
            options.album_path()?,
            options.album_password.clone(),
            options.track_directories(),
            options.order_pattern()?,
        ))
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Lists, merges, filters and sorts the album tracks
    pub async fn collect(&self) -> Result<Vec<DirectoryEntry>> {
        let listings = try_join_all(
            self.directories
                .iter()
                .map(|directory| self.list_directory(directory)),
        )
        .await?;

        let entries: Vec<DirectoryEntry> = listings
            .into_iter()
            .flatten()
            .filter(|entry| !entry.is_dir)
            .collect();

        let tracks = self.sort(entries);
        info!(
            "📀 {} tracks collected from {} directories of {}",
            tracks.len(),
            self.directories.len(),
            self.album_path
        );
        Ok(tracks)
    }

    async fn list_directory(&self, directory: &str) -> Result<Vec<DirectoryEntry>> {
        let remote_path = path::join(&self.album_path, directory);
        debug!("Listing {}", remote_path);

        let page = self
            .service
            .list_directory(&remote_path, &self.password, FIRST_PAGE, ALL_ENTRIES, false)
            .await?;

        Ok(page
            .entries
            .into_iter()
            .map(|mut entry| {
                entry.source_directory = directory.to_string();
                entry
            })
            .collect())
    }

    /// Stable sort on the extracted order key
    fn sort(&self, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
        let mut keyed: Vec<(OrderKey, DirectoryEntry)> = entries
            .into_iter()
            .map(|entry| (OrderKey::parse(&self.order.apply(&entry.name)), entry))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        keyed.into_iter().map(|(_, entry)| entry).collect()
    }
}
