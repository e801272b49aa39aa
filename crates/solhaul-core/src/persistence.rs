//! Save/Load functionality for persisting session state.
//!
//! Binary snapshots use bincode over any `Write`/`Read`; a JSON form is
//! offered for slot stores that only accept text records. Both carry the
//! same `SaveData` shape. The connection graph and the pending event queue
//! are rebuilt on load rather than persisted.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::company::Company;
use crate::config::GameConfig;
use crate::rocket::Rocket;
use crate::session::{ExplorationMission, GameSession};

/// Version number for the save format (increment when the shape changes).
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: GameConfig,
    pub sol: u64,
    pub sol_progress: f64,
    pub company: Company,
    pub rockets: Vec<Rocket>,
    #[serde(default)]
    pub missions: Vec<ExplorationMission>,
}

/// Errors that can occur during save/load.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl GameSession {
    /// Snapshot the persistable parts of this session.
    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            config: self.config.clone(),
            sol: self.sol,
            sol_progress: self.sol_progress,
            company: self.company.clone(),
            rockets: self.rockets.clone(),
            missions: self.missions.clone(),
        }
    }

    /// Rebuild a session from a snapshot, rejecting unknown versions.
    pub fn from_save_data(data: SaveData) -> Result<Self, SaveError> {
        if data.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: data.version,
            });
        }
        Ok(Self::from_parts(
            data.company,
            data.rockets,
            data.missions,
            data.sol,
            data.sol_progress,
            data.config,
        ))
    }

    /// Write a binary snapshot of the session.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        bincode::serialize_into(writer, &self.to_save_data())?;
        Ok(())
    }

    /// Read a session back from a binary snapshot.
    pub fn load<R: Read>(reader: R) -> Result<Self, SaveError> {
        let data: SaveData = bincode::deserialize_from(reader)?;
        Self::from_save_data(data)
    }

    /// JSON form of the snapshot, for text-only slot stores.
    pub fn save_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(&self.to_save_data())?)
    }

    /// Read a session back from its JSON form.
    pub fn load_json(json: &str) -> Result<Self, SaveError> {
        let data: SaveData = serde_json::from_str(json)?;
        Self::from_save_data(data)
    }
}
