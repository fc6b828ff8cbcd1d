//! Cycle de vie du lecteur d'album
//!
//! [`PlaylistOrchestrator`] ties the pieces together for one player instance:
//!
//! ```text
//! Idle ──attach──▶ Loading ──▶ Ready ──▶ Attached ──detach──▶ Detached
//!                     │
//!                     └──(listing, cover or player failure)──▶ Failed
//! ```
//!
//! Loading waits concurrently for the player assets, the track collection and
//! the optional cover lookup. Once attached, player notifications keep the
//! playback record of the album up to date, and the first metadata
//! notification restores the stored position.

use crate::collector::TrackCollector;
use crate::options::{AlbumIdentity, AlbumOptions, PlayerOptions};
use crate::persistence::{AlbumRecord, PlaybackStateStore};
use crate::player::{event_channel, PlayerBackend, PlayerEvent, PlayerEventReceiver};
use crate::track::{AudioItem, AudioListBuilder};
use crate::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, error, info};
use ysxsalist::{path, DirectoryService};

/// Lifecycle state of an orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Loading,
    Ready,
    Attached,
    Detached,
    Failed,
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Position restoration, armed once per attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restoration {
    Pending,
    Armed,
    Done,
}

#[derive(Debug, Default)]
struct DetachSignal {
    requested: AtomicBool,
    notify: Notify,
}

/// Requests a detach from outside the orchestrator
///
/// Useful while [`PlaylistOrchestrator::attach`] or
/// [`PlaylistOrchestrator::run`] hold the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct DetachHandle {
    signal: Arc<DetachSignal>,
}

impl DetachHandle {
    pub fn request(&self) {
        self.signal.requested.store(true, Ordering::SeqCst);
        self.signal.notify.notify_one();
    }

    pub fn is_requested(&self) -> bool {
        self.signal.requested.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        while !self.is_requested() {
            self.signal.notify.notified().await;
        }
    }
}

enum Next {
    Event(PlayerEvent),
    Detach,
    Closed,
}

/// Drives one player instance for one album
pub struct PlaylistOrchestrator {
    options: AlbumOptions,
    player_options: PlayerOptions,
    service: Arc<dyn DirectoryService>,
    store: PlaybackStateStore,
    player: Option<Box<dyn PlayerBackend>>,
    state: OrchestratorState,
    identity: Option<AlbumIdentity>,
    record: Option<AlbumRecord>,
    audio: Vec<AudioItem>,
    events: Option<PlayerEventReceiver>,
    restoration: Restoration,
    detach_signal: DetachHandle,
}

impl PlaylistOrchestrator {
    pub fn new(
        options: AlbumOptions,
        service: Arc<dyn DirectoryService>,
        store: PlaybackStateStore,
        player: Box<dyn PlayerBackend>,
    ) -> Self {
        Self {
            options,
            player_options: PlayerOptions::default(),
            service,
            store,
            player: Some(player),
            state: OrchestratorState::Idle,
            identity: None,
            record: None,
            audio: Vec::new(),
            events: None,
            restoration: Restoration::Pending,
            detach_signal: DetachHandle::default(),
        }
    }

    /// Presentation flags handed to the player on mount
    pub fn with_player_options(mut self, player_options: PlayerOptions) -> Self {
        self.player_options = player_options;
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Items mounted on the player, empty until attached
    pub fn audio_list(&self) -> &[AudioItem] {
        &self.audio
    }

    /// Album key, known once `attach` passed validation
    pub fn identity(&self) -> Option<&AlbumIdentity> {
        self.identity.as_ref()
    }

    pub fn options(&self) -> &AlbumOptions {
        &self.options
    }

    pub fn detach_handle(&self) -> DetachHandle {
        self.detach_signal.clone()
    }

    /// Loads the album and mounts it on the player
    ///
    /// Configuration problems are reported before any network call and
    /// leave the orchestrator `Idle`. Load failures move it to `Failed`.
    pub async fn attach(&mut self) -> Result<()> {
        if self.state != OrchestratorState::Idle {
            return Err(Error::InvalidState {
                expected: OrchestratorState::Idle,
                actual: self.state,
            });
        }

        let album_path = self.options.album_path()?;
        let name_pattern = self.options.name_pattern()?;
        let collector = TrackCollector::from_options(self.service.clone(), &self.options)?;
        let identity = self.options.identity()?;

        self.record = Some(self.store.album(identity.clone()));
        self.identity = Some(identity.clone());
        self.state = OrchestratorState::Loading;
        info!("⏳ Loading album {}", identity);

        if self.detach_signal.is_requested() {
            self.discard_load(&identity);
            return Ok(());
        }

        let Some(player) = self.player.as_mut() else {
            self.state = OrchestratorState::Failed;
            return Err(Error::player("no player available"));
        };

        let loaded = tokio::try_join!(
            player.prepare(),
            collector.collect(),
            fetch_cover(self.service.as_ref(), &self.options, &album_path),
        );

        let (_, entries, cover) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("❌ Failed to load album {}: {}", identity, e);
                self.state = OrchestratorState::Failed;
                return Err(e);
            }
        };

        if self.detach_signal.is_requested() {
            self.discard_load(&identity);
            return Ok(());
        }

        self.state = OrchestratorState::Ready;
        self.audio = AudioListBuilder::new(self.service.as_ref(), &self.options, name_pattern)?
            .with_cover(cover)
            .build(&entries);

        self.mount(&identity)
    }

    /// `Ready -> Attached`
    fn mount(&mut self, identity: &AlbumIdentity) -> Result<()> {
        let Some(player) = self.player.as_mut() else {
            self.state = OrchestratorState::Failed;
            return Err(Error::player("no player available"));
        };

        if let Err(e) = player.mount(&self.audio, &self.player_options) {
            error!("❌ Player refused the audio list of {}: {}", identity, e);
            self.state = OrchestratorState::Failed;
            return Err(e);
        }

        let (sender, receiver) = event_channel();
        player.subscribe(sender);
        self.events = Some(receiver);
        self.state = OrchestratorState::Attached;

        self.restore_index();
        info!("▶️ Album {} attached with {} tracks", identity, self.audio.len());
        Ok(())
    }

    fn discard_load(&mut self, identity: &AlbumIdentity) {
        debug!("Detach requested while loading {}, discarding results", identity);
        self.player = None;
        self.state = OrchestratorState::Detached;
    }

    /// Switches to the stored track; the position is only restored with it
    fn restore_index(&mut self) {
        self.restoration = Restoration::Done;
        let stored = self.record.as_ref().and_then(AlbumRecord::query_index);

        if let (Some(index), Some(player)) = (stored, self.player.as_mut()) {
            if index < self.audio.len() {
                if index > 0 {
                    player.switch_track(index);
                }
                self.restoration = Restoration::Armed;
                debug!("Restored track index {}", index);
            } else {
                debug!(
                    "Stored track index {} out of range ({} tracks), ignored",
                    index,
                    self.audio.len()
                );
            }
        }
    }

    /// Record of the album while attached
    fn attached_record(&self) -> Option<&AlbumRecord> {
        match self.state {
            OrchestratorState::Attached => self.record.as_ref(),
            _ => None,
        }
    }

    pub fn on_track_change(&self, index: usize) {
        if let Some(record) = self.attached_record() {
            record.save_index(index);
        }
    }

    /// Position reports are only stored while playing
    pub fn on_time_update(&self, time: f64, paused: bool) {
        if paused {
            return;
        }
        if let Some(record) = self.attached_record() {
            record.save_time(time);
        }
    }

    pub fn on_pause(&self, time: f64) {
        if let Some(record) = self.attached_record() {
            record.save_time(time);
        }
    }

    /// Seeks to the stored position on the first call after attach
    pub fn on_metadata_loaded(&mut self, duration: f64) {
        if self.state != OrchestratorState::Attached || self.restoration != Restoration::Armed {
            return;
        }
        self.restoration = Restoration::Done;

        let Some(time) = self.record.as_ref().and_then(AlbumRecord::query_time) else {
            return;
        };

        if duration > 0.0 && time <= duration {
            if let Some(player) = self.player.as_mut() {
                debug!("Restoring position {}s of {}s", time, duration);
                player.seek(time);
            }
        } else {
            debug!("Stored position {}s beyond duration {}s, ignored", time, duration);
        }
    }

    pub fn dispatch(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Play { index } | PlayerEvent::TrackChanged { index } => {
                self.on_track_change(index)
            }
            PlayerEvent::Pause { time } => self.on_pause(time),
            PlayerEvent::TimeUpdate { time, paused } => self.on_time_update(time, paused),
            PlayerEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
        }
    }

    /// Handles the notifications already queued, returns how many
    pub fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = match self.events.as_mut() {
                Some(receiver) => receiver.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => {
                    self.dispatch(event);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Handles notifications until the player goes away or a detach is requested
    pub async fn run(&mut self) {
        loop {
            let next = {
                let Some(receiver) = self.events.as_mut() else {
                    break;
                };
                let signal = self.detach_signal.clone();
                tokio::select! {
                    biased;
                    event = receiver.recv() => match event {
                        Some(event) => Next::Event(event),
                        None => Next::Closed,
                    },
                    _ = signal.wait() => Next::Detach,
                }
            };

            match next {
                Next::Event(event) => self.dispatch(event),
                Next::Detach => {
                    self.detach();
                    break;
                }
                Next::Closed => {
                    debug!("Player notifications closed");
                    break;
                }
            }
        }
    }

    /// Releases the player; no playback record is written afterwards
    pub fn detach(&mut self) {
        if self.state == OrchestratorState::Detached {
            return;
        }
        self.detach_signal.request();

        if let Some(mut player) = self.player.take() {
            if self.events.is_some() {
                player.unsubscribe();
            }
            if self.state == OrchestratorState::Attached {
                player.destroy();
            }
        }

        self.events = None;
        self.restoration = Restoration::Done;
        self.state = OrchestratorState::Detached;
        match self.identity.as_ref() {
            Some(identity) => info!("⏹️ Album {} detached", identity),
            None => info!("⏹️ Player detached"),
        }
    }
}

/// Direct URL of the album cover, empty when none is configured
async fn fetch_cover(
    service: &dyn DirectoryService,
    options: &AlbumOptions,
    album_path: &str,
) -> Result<String> {
    if !options.has_cover() {
        return Ok(String::new());
    }

    let cover_path = path::join(album_path, &options.cover_path);
    let entry = service
        .get_file_info(&cover_path, &options.album_password)
        .await?;
    Ok(entry.raw_url_or_default().to_string())
}
