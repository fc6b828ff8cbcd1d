//! Lecteur sans interface
//!
//! Keeps the mounted list and the current position in memory. Used to check
//! an album configuration from the command line.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;
use ysxsplaylist::{AudioItem, PlayerBackend, PlayerEventSender, PlayerOptions};

/// What the headless player currently holds
#[derive(Debug, Default, Clone)]
pub struct HeadlessState {
    pub tracks: usize,
    pub current: usize,
    pub position: f64,
}

pub struct HeadlessPlayer {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessPlayer {
    pub fn new() -> (Self, Arc<Mutex<HeadlessState>>) {
        let state = Arc::new(Mutex::new(HeadlessState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

#[async_trait]
impl PlayerBackend for HeadlessPlayer {
    async fn prepare(&mut self) -> ysxsplaylist::Result<()> {
        Ok(())
    }

    fn mount(&mut self, audio: &[AudioItem], options: &PlayerOptions) -> ysxsplaylist::Result<()> {
        debug!("Mounting {} tracks ({:?})", audio.len(), options);
        let mut state = self
            .state
            .lock()
            .map_err(|_| ysxsplaylist::Error::player("headless state poisoned"))?;
        state.tracks = audio.len();
        state.current = 0;
        state.position = 0.0;
        Ok(())
    }

    fn switch_track(&mut self, index: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.current = index;
            state.position = 0.0;
        }
    }

    fn seek(&mut self, time: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.position = time;
        }
    }

    /// Nothing is ever played, so no notification is sent
    fn subscribe(&mut self, _events: PlayerEventSender) {
        debug!("Headless player subscribed");
    }

    fn unsubscribe(&mut self) {}

    fn destroy(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            *state = HeadlessState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_player_tracks_position() {
        let (mut player, state) = HeadlessPlayer::new();
        let audio = vec![AudioItem::default(), AudioItem::default()];

        player.mount(&audio, &PlayerOptions::default()).unwrap();
        player.switch_track(1);
        player.seek(42.0);
        {
            let state = state.lock().unwrap();
            assert_eq!(state.tracks, 2);
            assert_eq!(state.current, 1);
            assert_eq!(state.position, 42.0);
        }

        player.destroy();
        assert_eq!(state.lock().unwrap().tracks, 0);
    }
}
