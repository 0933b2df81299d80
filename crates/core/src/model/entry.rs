use chrono::NaiveDate;
use thiserror::Error;

use crate::model::ids::EntryId;
use crate::stats::parse_hours;

//
// ─── ENTRY TYPES ───────────────────────────────────────────────────────────────
//

/// User input for a practice entry, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub hours: String,
    pub notes: String,
}

impl EntryDraft {
    /// Empty draft dated `date` (form default is "today").
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            hours: String::new(),
            notes: String::new(),
        }
    }

    /// Checks required fields without consuming the draft.
    ///
    /// # Errors
    ///
    /// Returns `EntryValidationError` when `hours` or `notes` is blank.
    pub fn validate(&self) -> Result<ValidatedEntry, EntryValidationError> {
        if self.hours.trim().is_empty() {
            return Err(EntryValidationError::EmptyHours);
        }
        if self.notes.trim().is_empty() {
            return Err(EntryValidationError::EmptyNotes);
        }
        Ok(ValidatedEntry {
            date: self.date,
            hours: self.hours.clone(),
            notes: self.notes.clone(),
        })
    }
}

/// An entry draft that passed validation and is waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    date: NaiveDate,
    hours: String,
    notes: String,
}

impl ValidatedEntry {
    #[must_use]
    pub fn assign_id(self, id: EntryId) -> Entry {
        Entry {
            id,
            date: self.date,
            hours: self.hours,
            notes: self.notes,
        }
    }
}

/// One logged practice session. Immutable once created: entries are only
/// appended to a skill, never edited or removed.
///
/// `hours` stays the raw text the user typed; the store round-trips it
/// untouched and aggregation parses it lazily via [`Entry::hours_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: EntryId,
    date: NaiveDate,
    hours: String,
    notes: String,
}

impl Entry {
    /// Rebuilds an entry from persisted fields.
    #[must_use]
    pub fn from_parts(id: EntryId, date: NaiveDate, hours: String, notes: String) -> Self {
        Self {
            id,
            date,
            hours,
            notes,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Raw hours text as entered.
    #[must_use]
    pub fn hours_raw(&self) -> &str {
        &self.hours
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Numeric value of `hours`; unparsable input counts as zero.
    #[must_use]
    pub fn hours_value(&self) -> f64 {
        parse_hours(&self.hours)
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryValidationError {
    #[error("entry hours cannot be empty")]
    EmptyHours,

    #[error("entry notes cannot be empty")]
    EmptyNotes,
}
