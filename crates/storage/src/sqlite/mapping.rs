use std::str::FromStr;

use tracker_core::model::{ColorTag, EntryId};

use crate::repository::StorageError;

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn entry_id_to_i64(id: EntryId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("entry id overflow".into()))
}

pub(super) fn entry_id_from_i64(raw: i64) -> Result<EntryId, StorageError> {
    u64::try_from(raw)
        .map(EntryId::new)
        .map_err(|_| StorageError::Serialization("entry id sign overflow".into()))
}

pub(super) fn color_from_text(raw: &str) -> Result<ColorTag, StorageError> {
    ColorTag::from_str(raw).map_err(ser)
}
