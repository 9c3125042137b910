use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const EXPIRY: Duration = Duration::from_secs(365 * 24 * 60 * 60);
const MAX_COUNT: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct TrackerFile {
    count: u32,
    saved_at_secs: u64,
}

/// Small persisted counter of how many times the participant has reset the
/// conversation. Cycles 1, 2, 0 on successive resets and forgets itself after
/// a year, matching the cookie it replaces.
#[derive(Debug)]
pub struct ResetTracker {
    path: PathBuf,
    count: u32,
}

impl ResetTracker {
    /// Loads the counter from `path`, treating a missing, unreadable, or
    /// expired file as count 0.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let count = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<TrackerFile>(&raw).ok())
            .filter(|f| !is_expired(f.saved_at_secs))
            .map(|f| f.count)
            .unwrap_or(0);
        ResetTracker { path, count }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Bumps the counter (wrapping past 2 back to 0) and persists it with a
    /// fresh timestamp. Returns the new count.
    pub fn record_reset(&mut self) -> std::io::Result<u32> {
        self.count += 1;
        if self.count > MAX_COUNT {
            self.count = 0;
        }
        let file = TrackerFile {
            count: self.count,
            saved_at_secs: now_secs(),
        };
        let raw = serde_json::to_string(&file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, raw)?;
        Ok(self.count)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn is_expired(saved_at_secs: u64) -> bool {
    now_secs().saturating_sub(saved_at_secs) > EXPIRY.as_secs()
}
