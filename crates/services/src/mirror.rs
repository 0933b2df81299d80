use tokio::sync::watch;
use tracing::debug;

use storage::repository::{SkillStore, SkillsSnapshot};

use crate::error::MirrorReleased;

/// Local full-replacement mirror of the store's skill collection.
///
/// The mirror never merges: every view it hands out is a whole snapshot
/// published by the store, so no local-only skill can survive past the next
/// notification. The subscription is a scoped resource: it is acquired by
/// [`SkillMirror::attach`] and released exactly once, either explicitly via
/// [`SkillMirror::release`] or on drop. After release the mirror freezes on
/// the last snapshot it saw; later store writes cannot reach it.
pub struct SkillMirror {
    state: MirrorState,
}

enum MirrorState {
    Live(watch::Receiver<SkillsSnapshot>),
    Released(SkillsSnapshot),
}

impl SkillMirror {
    /// Open the subscription. The initial snapshot is readable immediately;
    /// no await is needed before the first [`SkillMirror::skills`] call.
    #[must_use]
    pub fn attach(store: &dyn SkillStore) -> Self {
        Self {
            state: MirrorState::Live(store.subscribe()),
        }
    }

    /// Latest snapshot the mirror holds: the store's current publication
    /// while live, the frozen final snapshot after release.
    #[must_use]
    pub fn skills(&self) -> SkillsSnapshot {
        match &self.state {
            MirrorState::Live(rx) => rx.borrow().clone(),
            MirrorState::Released(frozen) => frozen.clone(),
        }
    }

    /// Wait for the next snapshot publication.
    ///
    /// # Errors
    ///
    /// Returns `MirrorReleased` once the mirror has been released or the
    /// store side has gone away.
    pub async fn changed(&mut self) -> Result<(), MirrorReleased> {
        match &mut self.state {
            MirrorState::Live(rx) => rx.changed().await.map_err(|_| MirrorReleased),
            MirrorState::Released(_) => Err(MirrorReleased),
        }
    }

    /// Release the subscription, freezing the current snapshot. Idempotent:
    /// only the first call releases anything.
    pub fn release(&mut self) {
        if let MirrorState::Live(rx) = &self.state {
            let frozen = rx.borrow().clone();
            debug!(skills = frozen.len(), "releasing skill mirror");
            self.state = MirrorState::Released(frozen);
        }
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        matches!(self.state, MirrorState::Released(_))
    }
}

impl Drop for SkillMirror {
    fn drop(&mut self) {
        self.release();
    }
}
