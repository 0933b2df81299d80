//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SkillService`.
///
/// Validation failures are not errors here: a submission with missing
/// required fields is declined before the store is called and reported as
/// `Ok(None)` by the service methods.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SkillServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The mirror's subscription has been released (or the store side is gone);
/// no further notifications will be observed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("skill mirror subscription released")]
pub struct MirrorReleased;
