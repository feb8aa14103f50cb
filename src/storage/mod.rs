use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{app_config_dir, ConfigPathError, APP_DIR};

const CONSENT_FILE: &str = "consent.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read consent record: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write consent record: {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse consent record")]
    Parse(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentDecision {
    Granted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub decision: ConsentDecision,
    #[serde(default)]
    pub declines: u32,
    #[serde(default)]
    pub updated_at: u64,
}

impl ConsentRecord {
    pub fn granted() -> Self {
        Self {
            decision: ConsentDecision::Granted,
            declines: 0,
            updated_at: unix_now(),
        }
    }

    /// A decline on top of `previous`, counting repeated refusals.
    pub fn declined_after(previous: Option<&ConsentRecord>) -> Self {
        let declines = previous
            .filter(|record| record.decision == ConsentDecision::Declined)
            .map_or(0, |record| record.declines)
            .saturating_add(1);
        Self {
            decision: ConsentDecision::Declined,
            declines,
            updated_at: unix_now(),
        }
    }
}

pub trait ConsentStorage {
    fn load(&self) -> StorageResult<Option<ConsentRecord>>;
    fn save(&self, record: &ConsentRecord) -> StorageResult<()>;
}

#[derive(Debug, Clone)]
pub struct ConsentStore {
    path: PathBuf,
}

impl ConsentStore {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The consent record inside a settings directory.
    pub fn in_dir(settings_dir: &Path) -> Self {
        Self::with_path(settings_dir.join(CONSENT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConsentStorage for ConsentStore {
    fn load(&self) -> StorageResult<Option<ConsentRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, record: &ConsentRecord) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let serialized = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, serialized).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), decision = ?record.decision, "saved consent record");
        Ok(())
    }
}

/// The directory holding `config.json` and the consent record.
pub fn default_settings_dir(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> StorageResult<PathBuf> {
    app_config_dir(APP_DIR, xdg_config_home, home).map_err(|err| match err {
        ConfigPathError::MissingHomeDirectory => StorageError::MissingHomeDirectory,
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
