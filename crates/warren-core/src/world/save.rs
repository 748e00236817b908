//! Save and restore.
//!
//! The whole data model serializes to a single JSON document with a small
//! version header. Loading is all-or-nothing: on any failure the caller's
//! current state is left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gameloop::GameState;

/// Save format version; bumped on breaking layout changes.
pub const SAVE_VERSION: u32 = 2;

const SAVE_FILE_NAME: &str = "savegame.json";
const SAVE_DIR_NAME: &str = "warren";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupted save data: {0}")]
    Corrupted(#[from] serde_json::Error),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// On-disk envelope around the serialized game state.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    /// RFC 3339 timestamp, informational only.
    pub saved_at: String,
    pub state: GameState,
}

/// Default location under the platform data directory, falling back to
/// the working directory when none exists.
pub fn default_save_path() -> PathBuf {
    match dirs::data_dir() {
        Some(base) => base.join(SAVE_DIR_NAME).join(SAVE_FILE_NAME),
        None => PathBuf::from(SAVE_FILE_NAME),
    }
}

pub fn save_game(state: &GameState, path: &Path) -> Result<(), SaveError> {
    let file = SaveFile {
        version: SAVE_VERSION,
        saved_at: chrono::Utc::now().to_rfc3339(),
        state: state.clone(),
    };
    let json = serde_json::to_string(&file)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

/// Load a saved game. Transient state (visibility, event queues, digest)
/// is rebuilt, so the returned state is ready to play.
pub fn load_game(path: &Path) -> Result<GameState, SaveError> {
    let json = fs::read_to_string(path)?;
    let file: SaveFile = serde_json::from_str(&json)?;
    if file.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: file.version,
        });
    }
    let mut state = file.state;
    state.rebuild_transient();
    Ok(state)
}
