mod color;
mod entry;
mod ids;
mod skill;

pub use color::{ColorTag, ParseColorError};
pub use entry::{Entry, EntryDraft, EntryValidationError, ValidatedEntry};
pub use ids::{EntryId, EntryIdGenerator, ParseIdError, SkillId};
pub use skill::{DEFAULT_TARGET_HOURS, Skill, SkillDraft, SkillValidationError, ValidatedSkill};
