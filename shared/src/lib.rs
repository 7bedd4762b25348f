use serde::{Deserialize, Serialize};
use std::fmt;

pub mod attributes;
pub mod change_set;
pub mod config;
pub mod error;
pub mod filter;
pub mod forms;
pub mod item;
pub mod money;
pub mod state;
pub mod sync;

pub use attributes::ItemAttributes;
pub use change_set::ChangeSet;
pub use config::{ItemCapabilities, TrackerConfig};
pub use error::{AttributeError, MoneyError, StateError, SyncError};
pub use filter::{FilterController, FilterSelection};
pub use forms::FormSubmission;
pub use item::{Baseline, ItemRecord};
pub use money::{format_money, parse_money};
pub use state::{BatchSave, ImmediateChange, PendingImmediate, TrackerState};
pub use sync::{Endpoint, SyncClient, SyncRequest, SyncTransport};

/// Server-assigned item identifier
pub type ItemId = i64;

/// Server-assigned category identifier
pub type CategoryId = i64;

/// Operating status of a maintenance item.
///
/// Travels over the wire as its integer code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Stopped,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Ok, Status::Warning, Status::Stopped];

    /// Next status in the cycle Ok -> Warning -> Stopped -> Ok
    pub fn next(self) -> Self {
        match self {
            Status::Ok => Status::Warning,
            Status::Warning => Status::Stopped,
            Status::Stopped => Status::Ok,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Stopped => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "Warning",
            Status::Stopped => "Stopped",
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Status::Ok),
            1 => Ok(Status::Warning),
            2 => Ok(Status::Stopped),
            other => Err(format!("Invalid status code {}", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A display grouping of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

/// Item as sent to the server on save or immediate update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub id: ItemId,
    pub title: String,
    pub category_id: CategoryId,
    pub details: ItemDetails,
}

/// Mutable fields of an item payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub status: Status,
    /// Free-text reason picked alongside the status
    #[serde(rename = "statdesc")]
    pub status_description: String,
    /// Repair cost in cents
    pub cost: u64,
    pub note: String,
    pub visible: bool,
    /// Server-side soft-delete flag
    pub removed: bool,
}
