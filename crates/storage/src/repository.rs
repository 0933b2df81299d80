use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use tracker_core::model::{ColorTag, Entry, EntryId, Skill, SkillId, ValidatedSkill};

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Full-replacement view of the skill collection, as published to
/// subscribers. Always the whole collection, never a delta.
pub type SkillsSnapshot = Arc<Vec<Skill>>;

//
// ─── DOCUMENT SHAPES ───────────────────────────────────────────────────────────
//

/// Fields for a skill document about to be created. The store assigns the
/// id and initializes the entry sequence to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkillRecord {
    pub name: String,
    pub category: String,
    pub target_hours: f64,
    pub color: ColorTag,
}

impl NewSkillRecord {
    #[must_use]
    pub fn from_validated(skill: &ValidatedSkill) -> Self {
        Self {
            name: skill.name().to_owned(),
            category: skill.category().to_owned(),
            target_hours: skill.target_hours(),
            color: skill.color(),
        }
    }
}

/// Persisted shape for one entry in a skill's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub date: NaiveDate,
    pub hours: String,
    pub notes: String,
}

impl EntryRecord {
    #[must_use]
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id(),
            date: entry.date(),
            hours: entry.hours_raw().to_owned(),
            notes: entry.notes().to_owned(),
        }
    }

    #[must_use]
    pub fn into_entry(self) -> Entry {
        Entry::from_parts(self.id, self.date, self.hours, self.notes)
    }
}

/// Persisted shape for a skill document.
///
/// Mirrors the domain `Skill` so backends can serialize without leaking
/// storage concerns into the domain layer. Raw documents may lack the
/// entry array entirely; it deserializes to empty in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub target_hours: f64,
    pub color: String,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

impl SkillRecord {
    #[must_use]
    pub fn from_skill(skill: &Skill) -> Self {
        Self {
            id: skill.id().as_str().to_owned(),
            name: skill.name().to_owned(),
            category: skill.category().to_owned(),
            target_hours: skill.target_hours(),
            color: skill.color().to_string(),
            entries: skill.entries().iter().map(EntryRecord::from_entry).collect(),
        }
    }

    /// Convert the record back into a domain `Skill`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the color tag is not in the
    /// palette.
    pub fn into_skill(self) -> Result<Skill, StorageError> {
        let color = ColorTag::from_str(&self.color)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Skill::from_parts(
            SkillId::new(self.id),
            self.name,
            self.category,
            self.target_hours,
            color,
            self.entries.into_iter().map(EntryRecord::into_entry).collect(),
        ))
    }
}

//
// ─── STORE CONTRACT ────────────────────────────────────────────────────────────
//

/// Store contract for the skill collection.
///
/// Backends publish a fresh [`SkillsSnapshot`] after every successful write;
/// `subscribe` hands out a receiver that already holds the current snapshot,
/// so the initial load and later change notifications use the same channel.
#[async_trait]
pub trait SkillStore: Send + Sync {
    /// Create a skill document with a store-assigned id and an empty entry
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn insert_new_skill(&self, skill: NewSkillRecord) -> Result<SkillId, StorageError>;

    /// Atomically append one entry to the named skill's sequence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown skill,
    /// `StorageError::Conflict` for a duplicate entry id, or other storage
    /// errors.
    async fn append_entry(&self, skill_id: &SkillId, entry: EntryRecord)
    -> Result<(), StorageError>;

    /// Full collection in stable (creation) order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read.
    async fn list_skills(&self) -> Result<Vec<Skill>, StorageError>;

    /// Open a live subscription. The receiver's current value is the latest
    /// snapshot; dropping the receiver releases the subscription.
    fn subscribe(&self) -> watch::Receiver<SkillsSnapshot>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// In-memory store for testing and prototyping.
#[derive(Clone)]
pub struct InMemorySkillStore {
    skills: Arc<Mutex<Vec<Skill>>>,
    snapshot_tx: Arc<watch::Sender<SkillsSnapshot>>,
}

impl InMemorySkillStore {
    #[must_use]
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(SkillsSnapshot::default());
        Self {
            skills: Arc::new(Mutex::new(Vec::new())),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    fn publish(&self, skills: &[Skill]) {
        let snapshot: SkillsSnapshot = Arc::new(skills.to_vec());
        debug!(skills = snapshot.len(), "publishing skill snapshot");
        self.snapshot_tx.send_replace(snapshot);
    }
}

impl Default for InMemorySkillStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkillStore for InMemorySkillStore {
    async fn insert_new_skill(&self, skill: NewSkillRecord) -> Result<SkillId, StorageError> {
        let mut guard = self
            .skills
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = SkillId::generate();
        guard.push(Skill::from_parts(
            id.clone(),
            skill.name,
            skill.category,
            skill.target_hours,
            skill.color,
            Vec::new(),
        ));
        self.publish(&guard);
        Ok(id)
    }

    async fn append_entry(
        &self,
        skill_id: &SkillId,
        entry: EntryRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .skills
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let position = guard
            .iter()
            .position(|skill| skill.id() == skill_id)
            .ok_or(StorageError::NotFound)?;
        if guard[position].entries().iter().any(|e| e.id() == entry.id) {
            return Err(StorageError::Conflict);
        }
        let updated = guard[position].clone().with_entry(entry.into_entry());
        guard[position] = updated;
        self.publish(&guard);
        Ok(())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StorageError> {
        let guard = self
            .skills
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    fn subscribe(&self) -> watch::Receiver<SkillsSnapshot> {
        self.snapshot_tx.subscribe()
    }
}

/// Store aggregate behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub skills: Arc<dyn SkillStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            skills: Arc::new(InMemorySkillStore::new()),
        }
    }
}
