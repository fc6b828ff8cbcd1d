//! Interface du lecteur audio externe
//!
//! The orchestrator never renders audio itself. It drives a [`PlayerBackend`]
//! (a widget, a renderer, a headless stub) and listens to the
//! [`PlayerEvent`]s the backend sends on the channel it was given.

use crate::options::PlayerOptions;
use crate::track::AudioItem;
use crate::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Notifications sent by the player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback started on the track at `index`
    Play { index: usize },
    /// Playback paused at `time` seconds
    Pause { time: f64 },
    /// The current track changed
    TrackChanged { index: usize },
    /// Periodic position report
    TimeUpdate { time: f64, paused: bool },
    /// Duration of the current track is known
    MetadataLoaded { duration: f64 },
}

pub type PlayerEventSender = mpsc::UnboundedSender<PlayerEvent>;
pub type PlayerEventReceiver = mpsc::UnboundedReceiver<PlayerEvent>;

/// Creates the channel a backend reports on
pub fn event_channel() -> (PlayerEventSender, PlayerEventReceiver) {
    mpsc::unbounded_channel()
}

#[async_trait]
pub trait PlayerBackend: Send {
    /// Waits until the player is able to mount a list
    async fn prepare(&mut self) -> Result<()>;

    /// Loads the audio list; playback position is the first track
    fn mount(&mut self, audio: &[AudioItem], options: &PlayerOptions) -> Result<()>;

    fn switch_track(&mut self, index: usize);

    /// Moves the current track to `time` seconds
    fn seek(&mut self, time: f64);

    /// Starts sending notifications on `events`
    fn subscribe(&mut self, events: PlayerEventSender);

    fn unsubscribe(&mut self);

    /// Clears the list and releases the player
    fn destroy(&mut self);
}
