use crate::{CategoryId, ItemId};

/// Failure to turn user-entered text into cents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
}

/// Failures talking to the server
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// No usable response came back (network down, unreadable body)
    #[error("Network error: {0}")]
    Transport(String),
    /// The server answered with something other than "OK"; shown verbatim
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Encode(e.to_string())
    }
}

/// Failures of operations on the tracker state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("Unknown category {0}")]
    UnknownCategory(CategoryId),
    #[error("Invalid repair cost for \"{title}\"")]
    InvalidAmount {
        title: String,
        #[source]
        source: MoneyError,
    },
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error("Nothing to save")]
    NothingToSave,
    #[error("{0} is not enabled")]
    Unsupported(&'static str),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Failures reading the server-rendered page-load attributes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("Missing attribute `{0}`")]
    Missing(&'static str),
    #[error("Invalid value for attribute `{name}`: {value:?}")]
    Invalid { name: &'static str, value: String },
}
