//! # ysxsplaylist - Playlist d'album audio servie par AList
//!
//! This crate turns the directories of an album stored on an AList server
//! into an ordered audio list, mounts it on an external player and keeps the
//! playback position of the album across sessions.
//!
//! ## Fonctionnalités
//!
//! - **Collecte**: concurrent listing of the configured track directories,
//!   merged and stably sorted on a key extracted from the file names
//! - **Extraction**: case-insensitive patterns for the sort key and the
//!   display name
//! - **Persistance**: per-album `{index, time}` records in one shared JSON
//!   mapping, merged on every write
//! - **Orchestration**: load, mount, restore and track the position on any
//!   [`PlayerBackend`]
//!
//! ## Exemple
//!
//! ```no_run
//! use std::sync::Arc;
//! use ysxsalist::AlistClient;
//! use ysxsplaylist::{AlbumOptions, TrackCollector};
//!
//! # async fn example() -> ysxsplaylist::Result<()> {
//! let client = Arc::new(AlistClient::new("https://pan.example.org")?);
//!
//! let mut options = AlbumOptions::new("https://pan.example.org", "/books/three-body");
//! options.track_path = "/track|/bonus".to_string();
//! options.track_order = r"(\d+)".to_string();
//!
//! let tracks = TrackCollector::from_options(client, &options)?.collect().await?;
//! for track in tracks {
//!     println!("{}{} {}", options.album_path, track.source_directory, track.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod order;
pub mod pattern;
pub mod persistence;
pub mod player;
pub mod track;

#[cfg(feature = "ysxsconfig")]
pub mod config_ext;

#[cfg(test)]
mod testing;

pub use collector::TrackCollector;
pub use error::{Error, Result};
pub use options::{AlbumIdentity, AlbumOptions, PlayerOptions};
pub use orchestrator::{DetachHandle, OrchestratorState, PlaylistOrchestrator};
pub use order::OrderKey;
pub use pattern::TrackPattern;
pub use persistence::{
    AlbumRecord, FileStorage, MemoryStorage, PlaybackRecord, PlaybackStateStore, RecordStorage,
    RECORDS_KEY,
};
pub use player::{PlayerBackend, PlayerEvent, PlayerEventSender};
pub use track::AudioItem;

#[cfg(feature = "ysxsconfig")]
pub use config_ext::AlbumConfigExt;
