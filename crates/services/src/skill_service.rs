use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use tracker_core::model::{EntryDraft, EntryId, EntryIdGenerator, SkillDraft, SkillId};
use storage::repository::{EntryRecord, NewSkillRecord, SkillStore};

use crate::Clock;
use crate::error::SkillServiceError;

/// Orchestrates outbound mutations against the skill store.
///
/// Both submission paths validate before calling the store: a draft with a
/// missing required field is declined (`Ok(None)`) and the store is never
/// touched, so the caller's form state stays as it was. Store failures are
/// returned as errors the caller can report or deliberately ignore.
#[derive(Clone)]
pub struct SkillService {
    clock: Clock,
    skills: Arc<dyn SkillStore>,
    entry_ids: Arc<EntryIdGenerator>,
}

impl SkillService {
    #[must_use]
    pub fn new(clock: Clock, skills: Arc<dyn SkillStore>) -> Self {
        Self {
            clock,
            skills,
            entry_ids: Arc::new(EntryIdGenerator::new()),
        }
    }

    /// Create a skill from the draft. The store assigns the id and the
    /// entry sequence starts empty.
    ///
    /// Returns `Ok(None)` when `name` or `category` is blank; no store call
    /// is made in that case.
    ///
    /// # Errors
    ///
    /// Returns `SkillServiceError::Storage` if the store call fails.
    pub async fn create_skill(
        &self,
        draft: &SkillDraft,
    ) -> Result<Option<SkillId>, SkillServiceError> {
        let validated = match draft.validate() {
            Ok(validated) => validated,
            Err(reason) => {
                debug!(%reason, "declined skill submission");
                return Ok(None);
            }
        };
        let id = self
            .skills
            .insert_new_skill(NewSkillRecord::from_validated(&validated))
            .await?;
        Ok(Some(id))
    }

    /// Append one entry to the selected skill. The entry id is generated
    /// from the clock at submit time.
    ///
    /// Returns `Ok(None)` when `hours` or `notes` is blank; no store call
    /// is made in that case.
    ///
    /// # Errors
    ///
    /// Returns `SkillServiceError::Storage` if the skill does not exist or
    /// the store call fails.
    pub async fn append_entry(
        &self,
        skill_id: &SkillId,
        draft: &EntryDraft,
    ) -> Result<Option<EntryId>, SkillServiceError> {
        let validated = match draft.validate() {
            Ok(validated) => validated,
            Err(reason) => {
                debug!(%reason, "declined entry submission");
                return Ok(None);
            }
        };
        let entry = validated.assign_id(self.entry_ids.next_id(self.clock.now()));
        let id = entry.id();
        self.skills
            .append_entry(skill_id, EntryRecord::from_entry(&entry))
            .await?;
        Ok(Some(id))
    }

    /// Fresh entry draft dated "today" according to the service clock (the
    /// add-entry form default).
    #[must_use]
    pub fn entry_draft_for_today(&self) -> EntryDraft {
        self.entry_draft_for(self.clock.now().date_naive())
    }

    /// Fresh entry draft for an explicitly chosen calendar date.
    #[must_use]
    pub fn entry_draft_for(&self, date: NaiveDate) -> EntryDraft {
        EntryDraft::for_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tracker_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemorySkillStore, StorageError};

    fn service_over(store: InMemorySkillStore) -> SkillService {
        SkillService::new(fixed_clock(), Arc::new(store))
    }

    #[tokio::test]
    async fn create_skill_persists_and_returns_id() {
        let store = InMemorySkillStore::new();
        let service = service_over(store.clone());

        let id = service
            .create_skill(&SkillDraft::new("Guitar", "Music"))
            .await
            .unwrap()
            .expect("accepted");

        let skills = store.list_skills().await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id(), &id);
        assert!(skills[0].entries().is_empty());
    }

    #[tokio::test]
    async fn create_skill_with_blank_category_never_calls_the_store() {
        let store = InMemorySkillStore::new();
        let service = service_over(store.clone());

        let draft = SkillDraft::new("Guitar", "");
        let before = draft.clone();
        let outcome = service.create_skill(&draft).await.unwrap();

        assert_eq!(outcome, None);
        assert!(store.list_skills().await.unwrap().is_empty());
        // the caller's draft is untouched, not cleared
        assert_eq!(draft, before);
    }

    #[tokio::test]
    async fn append_entry_with_blank_fields_is_declined() {
        let store = InMemorySkillStore::new();
        let service = service_over(store.clone());
        let id = service
            .create_skill(&SkillDraft::new("Guitar", "Music"))
            .await
            .unwrap()
            .expect("accepted");

        let mut draft = service.entry_draft_for_today();
        draft.hours = "1.5".into();
        // notes left blank
        let outcome = service.append_entry(&id, &draft).await.unwrap();

        assert_eq!(outcome, None);
        let skills = store.list_skills().await.unwrap();
        assert!(skills[0].entries().is_empty());
    }

    #[tokio::test]
    async fn entries_appended_in_the_same_millisecond_get_distinct_ids() {
        let store = InMemorySkillStore::new();
        // fixed clock: both submissions happen at the same instant
        let service = service_over(store.clone());
        let id = service
            .create_skill(&SkillDraft::new("Guitar", "Music"))
            .await
            .unwrap()
            .expect("accepted");

        let mut draft = service.entry_draft_for_today();
        draft.hours = "1".into();
        draft.notes = "first".into();
        let first = service.append_entry(&id, &draft).await.unwrap().unwrap();

        draft.notes = "second".into();
        let second = service.append_entry(&id, &draft).await.unwrap().unwrap();

        assert_ne!(first, second);
        let skills = store.list_skills().await.unwrap();
        assert_eq!(skills[0].entries().len(), 2);
    }

    #[tokio::test]
    async fn append_to_unknown_skill_surfaces_storage_error() {
        let service = service_over(InMemorySkillStore::new());
        let mut draft = service.entry_draft_for_today();
        draft.hours = "1".into();
        draft.notes = "n".into();

        let err = service
            .append_entry(&SkillId::new("missing"), &draft)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SkillServiceError::Storage(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn entry_draft_default_date_follows_the_clock() {
        let service = service_over(InMemorySkillStore::new());
        assert_eq!(service.entry_draft_for_today().date, fixed_now().date_naive());
    }
}
