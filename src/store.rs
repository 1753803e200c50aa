//! Persistence of game sessions between requests.
//!
//! The game logic never touches storage itself. A [`SessionStore`] keeps
//! opaque blobs keyed by session id, and a [`Codec`] turns a
//! [`GameSession`] into such a blob and back.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, warn};
use rand::rngs::SmallRng;

use crate::ai::Difficulty;
use crate::common::GameError;
use crate::config::GameConfig;
use crate::game::GameSession;

/// Wire format of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    #[default]
    Json,
    Binary,
}

impl Codec {
    pub fn encode(&self, session: &GameSession) -> Result<Vec<u8>, GameError> {
        Ok(match self {
            Codec::Json => serde_json::to_vec_pretty(session)?,
            Codec::Binary => bincode::serialize(session)?,
        })
    }

    /// Decode and validate a session. A blob that parses but breaks a game
    /// invariant is rejected as corrupt.
    pub fn decode(&self, bytes: &[u8]) -> Result<GameSession, GameError> {
        let session: GameSession = match self {
            Codec::Json => serde_json::from_slice(bytes)?,
            Codec::Binary => bincode::deserialize(bytes)?,
        };
        session.validate()?;
        Ok(session)
    }
}

/// Keyed storage for encoded sessions.
pub trait SessionStore {
    /// Stored blob for `id`, or `None` if there is none.
    fn load(&mut self, id: &str) -> Result<Option<Vec<u8>>, GameError>;

    fn save(&mut self, id: &str, blob: Vec<u8>) -> Result<(), GameError>;

    /// Forget the session entirely.
    fn destroy(&mut self, id: &str) -> Result<(), GameError>;
}

/// Sessions kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn load(&mut self, id: &str) -> Result<Option<Vec<u8>>, GameError> {
        Ok(self.sessions.get(id).cloned())
    }

    fn save(&mut self, id: &str, blob: Vec<u8>) -> Result<(), GameError> {
        self.sessions.insert(id.to_string(), blob);
        Ok(())
    }

    fn destroy(&mut self, id: &str) -> Result<(), GameError> {
        self.sessions.remove(id);
        Ok(())
    }
}

/// One file per session under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.session", id))
    }
}

impl SessionStore for FileStore {
    fn load(&mut self, id: &str) -> Result<Option<Vec<u8>>, GameError> {
        match fs::read(self.path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, id: &str, blob: Vec<u8>) -> Result<(), GameError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(id), blob)?;
        Ok(())
    }

    fn destroy(&mut self, id: &str) -> Result<(), GameError> {
        match fs::remove_file(self.path(id)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl GameSession {
    /// Resume the session stored under `id`, or start a fresh game when
    /// there is none or the stored one cannot be trusted. Corrupt sessions
    /// are never repaired.
    pub fn load_or_new<S: SessionStore + ?Sized>(
        store: &mut S,
        id: &str,
        codec: Codec,
        config: GameConfig,
        difficulty: Difficulty,
        rng: &mut SmallRng,
    ) -> Result<Self, GameError> {
        if let Some(blob) = store.load(id)? {
            match codec.decode(&blob) {
                Ok(session) => {
                    debug!("resumed session {}", id);
                    return Ok(session);
                }
                Err(e) => {
                    warn!("discarding stored session {}: {}", id, e);
                    store.destroy(id)?;
                }
            }
        }
        GameSession::new(config, difficulty, rng)
    }

    /// Encode and store this session under `id`.
    pub fn save<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        id: &str,
        codec: Codec,
    ) -> Result<(), GameError> {
        store.save(id, codec.encode(self)?)
    }
}
