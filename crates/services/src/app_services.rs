use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::mirror::SkillMirror;
use crate::skill_service::SkillService;

/// Assembles the app-facing services over a store backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    skill_service: Arc<SkillService>,
}

impl AppServices {
    /// Build services over the in-memory store (tests, prototyping).
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::over(clock, Storage::in_memory())
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::over(clock, storage))
    }

    fn over(clock: Clock, storage: Storage) -> Self {
        let skill_service = Arc::new(SkillService::new(clock, Arc::clone(&storage.skills)));
        Self {
            clock,
            storage,
            skill_service,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn skill_service(&self) -> Arc<SkillService> {
        Arc::clone(&self.skill_service)
    }

    /// Attach a fresh mirror to the underlying store. Each caller owns its
    /// mirror and releases it independently.
    #[must_use]
    pub fn mirror(&self) -> SkillMirror {
        SkillMirror::attach(self.storage.skills.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tracker_core::model::SkillDraft;
    use tracker_core::time::fixed_clock;

    #[tokio::test]
    async fn in_memory_services_share_one_store() {
        let app = AppServices::in_memory(fixed_clock());
        let mirror = app.mirror();

        app.skill_service()
            .create_skill(&SkillDraft::new("Guitar", "Music"))
            .await
            .unwrap()
            .expect("accepted");

        assert_eq!(mirror.skills().len(), 1);
    }
}
