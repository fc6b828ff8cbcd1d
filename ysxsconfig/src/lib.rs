//! # Configuration du lecteur ysxs
//!
//! The configuration is built from three layers, later ones winning:
//!
//! 1. the defaults embedded from `ysxs.yaml`;
//! 2. `<config_dir>/config.yaml`, seeded with the defaults on first run;
//! 3. `YSXS_CONFIG__SECTION__KEY=value` environment variables, whose values
//!    are read as YAML scalars.
//!
//! Keys are case-insensitive. Once loaded the configuration is read-only.
//!
//! ```no_run
//! use ysxsconfig::get_config;
//!
//! let config = get_config();
//! println!("AList server: {}", config.alist_url());
//! let records = config.managed_dir(&["records", "directory"], "records")?;
//! println!("Playback records in {}", records.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("ysxs.yaml");

const CONFIG_FILE: &str = "config.yaml";
const CONFIG_DIR_NAME: &str = ".ysxs";
const ENV_CONFIG_DIR: &str = "YSXS_CONFIG";
const ENV_PREFIX: &str = "YSXS_CONFIG__";

pub const DEFAULT_ALIST_URL: &str = "http://127.0.0.1:5244";
pub const DEFAULT_ALIST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_MIN_LEVEL: &str = "info";

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load(None).expect("Failed to load ysxs configuration"));
}

/// Returns the global configuration, loaded on first access
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merged configuration of the player
#[derive(Debug, Clone)]
pub struct Config {
    directory: PathBuf,
    tree: Value,
}

impl Config {
    /// Loads the configuration from `directory`
    ///
    /// Without a directory, the first of these is used: the `YSXS_CONFIG`
    /// environment variable, `./.ysxs` when it exists, `~/.ysxs` when it
    /// exists, and finally `./.ysxs`. The directory is created if needed.
    pub fn load(directory: Option<&Path>) -> Result<Self> {
        let directory = locate_dir(directory);
        prepare_dir(&directory)?;
        info!(config_dir = %directory.display(), "Using config directory");

        let mut tree = parse_layer(DEFAULT_CONFIG).context("Embedded configuration is invalid")?;

        let file = directory.join(CONFIG_FILE);
        match fs::read_to_string(&file) {
            Ok(text) => {
                let layer =
                    parse_layer(&text).with_context(|| format!("Invalid {}", file.display()))?;
                overlay(&mut tree, layer);
                info!(config_file = %file.display(), "Loaded config file");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&file, DEFAULT_CONFIG)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                info!(config_file = %file.display(), "Config file not found, defaults written");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", file.display()));
            }
        }

        for (path, value) in env_overrides(env::vars()) {
            debug!("Override of {} from the environment", path.join("."));
            insert_at(&mut tree, &path, value);
        }

        Ok(Self { directory, tree })
    }

    /// Directory holding `config.yaml`
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.tree, |node, key| node.get(key.to_lowercase()))
    }

    /// Scalar at `path` as text, or `default` when missing
    ///
    /// Numbers and booleans are rendered with their YAML spelling, so an
    /// album password written `1234` reads back as `"1234"`.
    pub fn get_string(&self, path: &[&str], default: &str) -> String {
        match self.lookup(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Boolean at `path`, or `default` when missing or not a boolean
    pub fn get_bool(&self, path: &[&str], default: bool) -> bool {
        match self.lookup(path) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    fn get_u64(&self, path: &[&str]) -> Option<u64> {
        match self.lookup(path)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Base URL of the AList server, `http://127.0.0.1:5244` when unset
    pub fn alist_url(&self) -> String {
        let url = self.get_string(&["alist", "url"], "");
        let url = url.trim();
        if url.is_empty() {
            warn!("AList URL is not set, using default {}", DEFAULT_ALIST_URL);
            return DEFAULT_ALIST_URL.to_string();
        }
        url.to_string()
    }

    /// Request timeout of the AList client
    pub fn alist_timeout(&self) -> Duration {
        match self.get_u64(&["alist", "timeout_secs"]) {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_ALIST_TIMEOUT,
        }
    }

    /// Login of the AList client, when both username and password are set
    pub fn alist_credentials(&self) -> Option<(String, String)> {
        let username = self.get_string(&["alist", "username"], "");
        let password = self.get_string(&["alist", "password"], "");
        (!username.is_empty() && !password.is_empty()).then_some((username, password))
    }

    /// Niveau de log minimum, en minuscules
    pub fn log_min_level(&self) -> String {
        self.get_string(&["host", "logger", "min_level"], DEFAULT_LOG_MIN_LEVEL)
            .to_lowercase()
    }

    pub fn log_console_enabled(&self) -> bool {
        self.get_bool(&["host", "logger", "enable_console"], true)
    }

    /// Directory named at `path`, created if needed
    ///
    /// Relative directories are resolved against the config directory;
    /// `default` is used when the entry is missing or empty.
    pub fn managed_dir(&self, path: &[&str], default: &str) -> Result<PathBuf> {
        let configured = self.get_string(path, "");
        let name = if configured.trim().is_empty() {
            default
        } else {
            configured.trim()
        };

        let dir = self.directory.join(name);
        if !dir.is_dir() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            info!(directory = %dir.display(), "Created managed directory");
        }
        Ok(dir)
    }
}

fn locate_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    if let Some(dir) = env::var_os(ENV_CONFIG_DIR) {
        info!(env_var = ENV_CONFIG_DIR, "Config directory taken from the environment");
        return PathBuf::from(dir);
    }

    let local = PathBuf::from(CONFIG_DIR_NAME);
    if local.is_dir() {
        return local;
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .filter(|dir| dir.is_dir())
        .unwrap_or(local)
}

fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    if !dir.is_dir() {
        return Err(anyhow!("Config path {} is not a directory", dir.display()));
    }
    Ok(())
}

/// Parses one YAML layer with lower-cased keys
fn parse_layer(text: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(text)?;
    Ok(lowercase_keys(value))
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (key, lowercase_keys(value))
                })
                .collect(),
        ),
        other => other,
    }
}

/// Lays `top` over `base`: sections merge, anything else replaces
///
/// A null layer (an empty file, or `key: ~`) leaves `base` untouched.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// `YSXS_CONFIG__ALBUM__ALBUM_PATH=/x` becomes `(["album", "album_path"], "/x")`
fn env_overrides(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Vec<(Vec<String>, Value)> {
    vars.into_iter()
        .filter_map(|(name, raw)| {
            let path: Vec<String> = name
                .strip_prefix(ENV_PREFIX)?
                .split("__")
                .map(str::to_lowercase)
                .collect();
            if path.iter().any(String::is_empty) {
                return None;
            }

            let value = if raw.is_empty() {
                Value::String(raw)
            } else {
                serde_yaml::from_str::<Value>(&raw).unwrap_or(Value::String(raw))
            };
            Some((path, value))
        })
        .collect()
}

/// Sets `value` at `path`, creating the missing sections
fn insert_at(node: &mut Value, path: &[String], value: Value) {
    let Some((key, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = node {
        let child = map
            .entry(Value::String(key.clone()))
            .or_insert(Value::Null);
        insert_at(child, rest, value);
    }
}
