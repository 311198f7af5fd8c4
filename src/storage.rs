use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const SESSION_STATE_KEY: &str = "session-state";
pub const STREAK_CACHE_KEY: &str = "streak-cache";

/// Storage keys are scoped per player (or the anonymous guest scope) and
/// per concern, e.g. "alice/session-state" or "guest/streak-cache".
pub fn scoped_key(player: Option<&str>, concern: &str) -> String {
    format!("{}/{}", player.unwrap_or("guest"), concern)
}

/// Minimal durable key-value surface the game persists through. Values are
/// JSON strings; readers must tolerate missing or garbage entries.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// One file per key under the app's data directory. I/O failures degrade to
/// "no value" on read and a logged warning on write; persistence is best
/// effort and never blocks gameplay.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open() -> Option<Self> {
        let dir = dirs::data_local_dir()?.join("daily-wordle");
        Self::at(dir)
    }

    pub fn at(dir: PathBuf) -> Option<Self> {
        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("cannot create data directory {}: {e}", dir.display());
            return None;
        }
        Some(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::write(&path, value) {
            log::warn!("failed to persist {}: {e}", path.display());
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
