use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Store-assigned identifier for a Skill.
///
/// The external store owns this value; it is opaque text, stable for the
/// lifetime of the skill document. The reference backends here use UUID v4
/// text, but nothing downstream depends on that.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Wraps an identifier handed out by the store.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier (used by store backends when
    /// creating a document).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an Entry within its Skill.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    /// Creates a new `EntryId`.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

// Room for 1024 ids per millisecond before issued ids run ahead of the clock.
const TIMESTAMP_SHIFT: u32 = 10;

/// Generates entry identifiers that are unique within the process.
///
/// Ids pack the creation timestamp (milliseconds) into the high bits and are
/// forced strictly increasing by an atomic high-water mark, so two entries
/// appended in the same millisecond still get distinct ids while staying
/// roughly time-ordered.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicU64,
}

impl EntryIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Issues the next identifier for an entry created at `now`.
    pub fn next_id(&self, now: DateTime<Utc>) -> EntryId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let floor = millis << TIMESTAMP_SHIFT;
        let prev = self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
                Some(floor.max(prev.saturating_add(1)))
            })
            .unwrap_or_else(|held| held);
        EntryId::new(floor.max(prev.saturating_add(1)))
    }
}

impl fmt::Debug for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SkillId({})", self.0)
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SkillId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Error type for parsing an `EntryId` from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for EntryId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(EntryId::new)
            .map_err(|_| ParseIdError {
                kind: "EntryId".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn skill_id_display_round_trips() {
        let id = SkillId::new("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(SkillId::from(id.as_str()), id);
    }

    #[test]
    fn generated_skill_ids_are_distinct() {
        assert_ne!(SkillId::generate(), SkillId::generate());
    }

    #[test]
    fn entry_id_from_str() {
        let id: EntryId = "123".parse().unwrap();
        assert_eq!(id, EntryId::new(123));
    }

    #[test]
    fn entry_id_from_str_invalid() {
        assert!("not-a-number".parse::<EntryId>().is_err());
    }

    #[test]
    fn same_millisecond_ids_are_distinct() {
        let generator = EntryIdGenerator::new();
        let now = fixed_now();
        let first = generator.next_id(now);
        let second = generator.next_id(now);
        let third = generator.next_id(now);
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(first < second && second < third);
    }

    #[test]
    fn later_timestamp_yields_larger_id() {
        let generator = EntryIdGenerator::new();
        let first = generator.next_id(fixed_now());
        let second = generator.next_id(fixed_now() + Duration::milliseconds(5));
        assert!(first < second);
    }

    #[test]
    fn ids_stay_unique_when_clock_goes_backwards() {
        let generator = EntryIdGenerator::new();
        let first = generator.next_id(fixed_now() + Duration::seconds(10));
        let second = generator.next_id(fixed_now());
        assert_ne!(first, second);
        assert!(second > first);
    }
}
