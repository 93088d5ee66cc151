//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type SplitResult<T> = Result<T, SplitError>;

/// Caller-surfaced validation error.
///
/// Every variant is recoverable: the operation that produced it left the
/// ledger untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// Person name was empty or whitespace-only.
    #[error("please enter a valid name")]
    InvalidName,

    /// A person with the same (case-sensitive) name already exists.
    #[error("person already exists: {0}")]
    DuplicateName(String),

    /// Item name or price failed validation.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// An item must be shared by at least one person when created.
    #[error("select at least one person to share the item")]
    EmptySharedBy,

    /// A sharer name does not refer to a person in the ledger.
    #[error("unknown person: {0}")]
    UnknownPerson(String),

    /// There are no items to export.
    #[error("no items to export")]
    ExportEmpty,

    /// The export writer failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl SplitError {
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    pub fn invalid_item(msg: impl Into<String>) -> Self {
        Self::InvalidItem(msg.into())
    }

    pub fn unknown_person(name: impl Into<String>) -> Self {
        Self::UnknownPerson(name.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}
