//! In-memory collaborators shared by the unit tests

use crate::options::PlayerOptions;
use crate::player::{PlayerBackend, PlayerEvent, PlayerEventSender};
use crate::track::AudioItem;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ysxsalist::{AlistError, DirectoryEntry, DirectoryPage, DirectoryService};

enum Listing {
    Entries(Vec<DirectoryEntry>),
    Failure(i64, String),
}

/// Directory tree served from memory
pub struct FakeDirectory {
    base_url: String,
    listings: HashMap<String, Listing>,
    files: HashMap<String, DirectoryEntry>,
    listed: Mutex<Vec<String>>,
    described: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            listings: HashMap::new(),
            files: HashMap::new(),
            listed: Mutex::new(Vec::new()),
            described: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(self, path: &str, names: &[&str]) -> Self {
        let entries = names.iter().map(|name| DirectoryEntry::file(*name)).collect();
        self.with_entries(path, entries)
    }

    pub fn with_entries(mut self, path: &str, entries: Vec<DirectoryEntry>) -> Self {
        self.listings
            .insert(path.to_string(), Listing::Entries(entries));
        self
    }

    pub fn with_failure(mut self, path: &str, code: i64, message: &str) -> Self {
        self.listings
            .insert(path.to_string(), Listing::Failure(code, message.to_string()));
        self
    }

    pub fn with_file(mut self, path: &str, raw_url: &str) -> Self {
        let mut entry = DirectoryEntry::file(path.rsplit('/').next().unwrap_or(path));
        entry.raw_url = Some(raw_url.to_string());
        self.files.insert(path.to_string(), entry);
        self
    }

    pub fn listed_paths(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub fn described_paths(&self) -> Vec<String> {
        self.described.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryService for FakeDirectory {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_directory(
        &self,
        path: &str,
        _password: &str,
        _page: u32,
        _per_page: u32,
        _refresh: bool,
    ) -> ysxsalist::Result<DirectoryPage> {
        self.listed.lock().unwrap().push(path.to_string());
        match self.listings.get(path) {
            Some(Listing::Entries(entries)) => Ok(DirectoryPage {
                entries: entries.clone(),
                total: entries.len() as u64,
            }),
            Some(Listing::Failure(code, message)) => {
                Err(AlistError::remote("/api/fs/list", *code, message.clone()))
            }
            None => Err(AlistError::remote("/api/fs/list", 500, "object not found")),
        }
    }

    async fn get_file_info(&self, path: &str, _password: &str) -> ysxsalist::Result<DirectoryEntry> {
        self.described.lock().unwrap().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AlistError::remote("/api/fs/get", 500, "object not found"))
    }
}

/// Everything a [`FakePlayer`] was asked to do
#[derive(Debug, Default)]
pub struct PlayerLog {
    pub prepared: bool,
    pub mounted: Vec<AudioItem>,
    pub options: Option<PlayerOptions>,
    pub switches: Vec<usize>,
    pub seeks: Vec<f64>,
    pub subscriber: Option<PlayerEventSender>,
    pub unsubscribed: bool,
    pub destroyed: bool,
}

/// Player recording its calls into a shared log
pub struct FakePlayer {
    log: Arc<Mutex<PlayerLog>>,
    fail_prepare: bool,
}

impl FakePlayer {
    pub fn new() -> (Self, Arc<Mutex<PlayerLog>>) {
        let log = Arc::new(Mutex::new(PlayerLog::default()));
        (
            Self {
                log: log.clone(),
                fail_prepare: false,
            },
            log,
        )
    }

    pub fn failing() -> (Self, Arc<Mutex<PlayerLog>>) {
        let (mut player, log) = Self::new();
        player.fail_prepare = true;
        (player, log)
    }
}

#[async_trait]
impl PlayerBackend for FakePlayer {
    async fn prepare(&mut self) -> Result<()> {
        if self.fail_prepare {
            return Err(Error::player("assets unavailable"));
        }
        self.log.lock().unwrap().prepared = true;
        Ok(())
    }

    fn mount(&mut self, audio: &[AudioItem], options: &PlayerOptions) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.mounted = audio.to_vec();
        log.options = Some(options.clone());
        Ok(())
    }

    fn switch_track(&mut self, index: usize) {
        self.log.lock().unwrap().switches.push(index);
    }

    fn seek(&mut self, time: f64) {
        self.log.lock().unwrap().seeks.push(time);
    }

    fn subscribe(&mut self, events: PlayerEventSender) {
        self.log.lock().unwrap().subscriber = Some(events);
    }

    fn unsubscribe(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.subscriber = None;
        log.unsubscribed = true;
    }

    fn destroy(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.mounted.clear();
        log.destroyed = true;
    }
}

/// Sends `event` through the channel the player was subscribed with
pub fn emit(log: &Arc<Mutex<PlayerLog>>, event: PlayerEvent) {
    let log = log.lock().unwrap();
    if let Some(sender) = log.subscriber.as_ref() {
        let _ = sender.send(event);
    }
}
