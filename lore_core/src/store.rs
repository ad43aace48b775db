//! Per-player knowledge state with lazy file persistence.
//!
//! Each player owns two disjoint sets of entry IDs: `learned` (currently
//! held) and `blocked` (permanently forbidden). An ID can move from learned
//! to blocked but never back, and a blocked ID can never be learned again.
//!
//! State is loaded from disk on first access (both sets together) and
//! written back after every mutation. A write failure is logged; the
//! in-memory state remains authoritative until the next successful write.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use lore_rules::PlayerId;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access player record: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed player record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// In-memory knowledge state for a single player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PlayerKnowledge {
    learned: HashSet<String>,
    blocked: HashSet<String>,
}

/// On-disk record layout: two ordered lists of entry IDs.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayerRecord {
    #[serde(default)]
    knowledge: Vec<String>,
    #[serde(default)]
    blocked: Vec<String>,
}

impl From<&PlayerKnowledge> for PlayerRecord {
    fn from(state: &PlayerKnowledge) -> Self {
        let mut knowledge: Vec<String> = state.learned.iter().cloned().collect();
        let mut blocked: Vec<String> = state.blocked.iter().cloned().collect();
        knowledge.sort();
        blocked.sort();
        Self { knowledge, blocked }
    }
}

impl From<PlayerRecord> for PlayerKnowledge {
    fn from(record: PlayerRecord) -> Self {
        Self {
            learned: record.knowledge.into_iter().collect(),
            blocked: record.blocked.into_iter().collect(),
        }
    }
}

/// Owns the learned/blocked state of every known player.
///
/// Construct one at startup and pass it by reference to every consumer;
/// call [`KnowledgeStore::save_all`] at shutdown. Callers must serialize
/// access per player - the store is not safe for concurrent mutation.
pub struct KnowledgeStore {
    dir: PathBuf,
    players: HashMap<PlayerId, PlayerKnowledge>,
}

impl KnowledgeStore {
    /// Create a store persisting player records under `dir`.
    ///
    /// The directory is created on first write; players that were never seen
    /// simply have no record yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            players: HashMap::new(),
        }
    }

    /// Whether the player currently holds the entry.
    pub fn has_learned(&mut self, player: PlayerId, entry_id: &str) -> bool {
        self.player_state(player).learned.contains(entry_id)
    }

    /// Whether the entry is permanently blocked for the player.
    pub fn is_blocked(&mut self, player: PlayerId, entry_id: &str) -> bool {
        self.player_state(player).blocked.contains(entry_id)
    }

    /// Mark an entry as learned unless it is blocked.
    ///
    /// Returns `false` when the entry is blocked (nothing changes). Learning
    /// an already-held entry is a no-op returning `true`.
    pub fn learn(&mut self, player: PlayerId, entry_id: &str) -> bool {
        let state = self.player_state(player);
        if state.blocked.contains(entry_id) {
            return false;
        }
        state.learned.insert(entry_id.to_string());
        self.persist(player);
        true
    }

    /// All entries the player currently holds.
    pub fn all_learned(&mut self, player: PlayerId) -> &HashSet<String> {
        &self.player_state(player).learned
    }

    /// All entries permanently blocked for the player.
    pub fn all_blocked(&mut self, player: PlayerId) -> &HashSet<String> {
        &self.player_state(player).blocked
    }

    /// Write every loaded player's record to disk.
    ///
    /// Intended for shutdown. Failures are logged per player and do not stop
    /// the flush.
    pub fn save_all(&self) {
        for player in self.players.keys() {
            self.persist(*player);
        }
    }

    // --- engine-facing raw mutators --------------------------------------

    /// Insert an entry into `learned` without persisting. The caller has
    /// already verified the entry is not blocked.
    pub(crate) fn grant(&mut self, player: PlayerId, entry_id: &str) {
        self.player_state(player).learned.insert(entry_id.to_string());
    }

    /// Permanently block an entry, removing it from `learned` if held.
    ///
    /// Returns whether the player actually held the entry.
    pub(crate) fn block(&mut self, player: PlayerId, entry_id: &str) -> bool {
        let state = self.player_state(player);
        state.blocked.insert(entry_id.to_string());
        state.learned.remove(entry_id)
    }

    /// Write a player's record to disk, logging (not returning) any failure.
    pub(crate) fn persist(&self, player: PlayerId) {
        if let Err(err) = self.try_persist(player) {
            tracing::error!(
                player = %player,
                error = %err,
                "failed to persist player record, keeping in-memory state"
            );
        }
    }

    // --- internals --------------------------------------------------------

    fn player_state(&mut self, player: PlayerId) -> &mut PlayerKnowledge {
        let dir = &self.dir;
        self.players
            .entry(player)
            .or_insert_with(|| load_player(dir, player))
    }

    fn record_path(&self, player: PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.json"))
    }

    fn try_persist(&self, player: PlayerId) -> Result<(), StoreError> {
        let Some(state) = self.players.get(&player) else {
            return Ok(());
        };
        std::fs::create_dir_all(&self.dir)?;
        let record = PlayerRecord::from(state);
        let contents = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.record_path(player), contents)?;
        Ok(())
    }
}

/// Load both sets for a player in one step. A missing record yields empty
/// sets; an unreadable or malformed one is logged and treated the same way.
fn load_player(dir: &Path, player: PlayerId) -> PlayerKnowledge {
    let path = dir.join(format!("{player}.json"));
    if !path.exists() {
        return PlayerKnowledge::default();
    }
    match try_load(&path) {
        Ok(record) => record.into(),
        Err(err) => {
            tracing::warn!(
                player = %player,
                error = %err,
                "ignoring unreadable player record"
            );
            PlayerKnowledge::default()
        }
    }
}

fn try_load(path: &Path) -> Result<PlayerRecord, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
