use thiserror::Error;

use crate::model::color::ColorTag;
use crate::model::entry::Entry;
use crate::model::ids::SkillId;

/// Default daily target applied when a draft leaves it unset.
pub const DEFAULT_TARGET_HOURS: f64 = 1.0;

//
// ─── SKILL TYPES ───────────────────────────────────────────────────────────────
//

/// User input for a new skill, before validation.
///
/// Carries the add-skill form defaults: one hour per day, blue tag.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDraft {
    pub name: String,
    pub category: String,
    pub target_hours: f64,
    pub color: ColorTag,
}

impl SkillDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Checks required fields without consuming the draft, so a declined
    /// submission leaves the caller's form state as it was.
    ///
    /// # Errors
    ///
    /// Returns `SkillValidationError` when `name` or `category` is blank.
    pub fn validate(&self) -> Result<ValidatedSkill, SkillValidationError> {
        if self.name.trim().is_empty() {
            return Err(SkillValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(SkillValidationError::EmptyCategory);
        }
        Ok(ValidatedSkill {
            name: self.name.clone(),
            category: self.category.clone(),
            target_hours: self.target_hours,
            color: self.color,
        })
    }
}

impl Default for SkillDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            target_hours: DEFAULT_TARGET_HOURS,
            color: ColorTag::default(),
        }
    }
}

/// A skill draft that passed validation and is waiting for a store id.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSkill {
    name: String,
    category: String,
    target_hours: f64,
    color: ColorTag,
}

impl ValidatedSkill {
    /// Attach the store-assigned id; the entry sequence starts empty.
    #[must_use]
    pub fn assign_id(self, id: SkillId) -> Skill {
        Skill {
            id,
            name: self.name,
            category: self.category,
            target_hours: self.target_hours,
            color: self.color,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn target_hours(&self) -> f64 {
        self.target_hours
    }

    #[must_use]
    pub fn color(&self) -> ColorTag {
        self.color
    }
}

/// A tracked practice subject with its logged entries, as mirrored from the
/// external store.
///
/// The constructor does not validate: snapshots must faithfully represent
/// whatever the store holds, including a zero or negative daily target.
/// Aggregation guards against those values instead of rejecting them here.
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    id: SkillId,
    name: String,
    category: String,
    target_hours: f64,
    color: ColorTag,
    entries: Vec<Entry>,
}

impl Skill {
    /// Rebuilds a skill from persisted fields. Entry order is append order
    /// and is preserved as given.
    #[must_use]
    pub fn from_parts(
        id: SkillId,
        name: String,
        category: String,
        target_hours: f64,
        color: ColorTag,
        entries: Vec<Entry>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            target_hours,
            color,
            entries,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SkillId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Daily practice target in hours. Only ever used as a denominator for
    /// progress ratios; may be zero or negative in foreign data.
    #[must_use]
    pub fn target_hours(&self) -> f64 {
        self.target_hours
    }

    #[must_use]
    pub fn color(&self) -> ColorTag {
        self.color
    }

    /// Entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Copy of this skill with `entry` appended (stores use this to build
    /// the post-append document; the mirror itself never mutates in place).
    #[must_use]
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkillValidationError {
    #[error("skill name cannot be empty")]
    EmptyName,

    #[error("skill category cannot be empty")]
    EmptyCategory,
}
