//! Error taxonomy for roster operations.

use crate::domain::crew::{RecordKey, ValidationErrors};
use crate::storage::sheet::SheetError;

/// A requested record could not be resolved in the current load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no crew record with {0}")]
    NotFound(RecordKey),

    #[error("{count} crew records match {key}; use a unique id")]
    Ambiguous { key: RecordKey, count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Presence/format checks failed; nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("backing store error: {0}")]
    BackingStore(#[from] SheetError),

    /// The header row does not describe a crew roster.
    #[error("sheet layout error: {0}")]
    Layout(String),

    #[error("row {row} cannot be decoded: {reason}")]
    MalformedRow { row: u32, reason: String },

    #[error("invalid filter: {0}")]
    Filter(String),
}

impl From<ValidationErrors> for RosterError {
    fn from(errors: ValidationErrors) -> Self {
        RosterError::Validation(errors)
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
