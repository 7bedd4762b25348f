//! Page-load contract: the attributes the server renders onto each
//! `<maintenance-item>` and `<maintenance-category>` element.

use crate::error::AttributeError;
use crate::money::parse_money;
use crate::{Category, CategoryId, ItemId, Status};

pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_CATEGORY_ID: &str = "categoryID";
pub const ATTR_VISIBLE: &str = "visible";
pub const ATTR_COST: &str = "cost";
pub const ATTR_STATUS: &str = "status";
pub const ATTR_STATUS_DESCRIPTION: &str = "statdesc";
pub const ATTR_OPTIONS: &str = "options";

/// Status description used when the server renders none
pub const DEFAULT_STATUS_DESCRIPTION: &str = "OK";

/// Separator between entries of the `options` attribute
pub const OPTIONS_SEPARATOR: char = ';';

/// Initial item state as rendered by the server
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAttributes {
    pub id: ItemId,
    pub title: String,
    pub category_id: CategoryId,
    pub visible: bool,
    /// Repair cost in cents
    pub cost: u64,
    pub status: Status,
    pub status_description: String,
    /// Status description choices offered for this item
    pub options: Vec<String>,
    /// Element body text
    pub note: String,
}

impl ItemAttributes {
    /// Read item attributes through `get`, which returns an attribute's raw
    /// value if present. Only `id` and `categoryID` are required.
    ///
    /// `cost` is a decimal amount as typed into the cost field (`"12.50"`).
    pub fn parse<F>(get: F, note: impl Into<String>) -> Result<Self, AttributeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let id = required(&get, ATTR_ID)?;
        let category_id = required(&get, ATTR_CATEGORY_ID)?;

        let visible = match get(ATTR_VISIBLE) {
            None => true,
            Some(raw) => parse_flag(ATTR_VISIBLE, &raw)?,
        };

        let cost = match get(ATTR_COST) {
            None => 0,
            Some(raw) => parse_money(&raw).map_err(|_| AttributeError::Invalid {
                name: ATTR_COST,
                value: raw,
            })?,
        };

        let status = match get(ATTR_STATUS) {
            None => Status::Ok,
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|code| Status::try_from(code).ok())
                .ok_or(AttributeError::Invalid {
                    name: ATTR_STATUS,
                    value: raw,
                })?,
        };

        let status_description = get(ATTR_STATUS_DESCRIPTION)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_DESCRIPTION.to_string());

        let options = get(ATTR_OPTIONS)
            .map(|raw| parse_options(&raw))
            .unwrap_or_default();

        Ok(Self {
            id,
            title: get(ATTR_TITLE).unwrap_or_default(),
            category_id,
            visible,
            cost,
            status,
            status_description,
            options,
            note: note.into(),
        })
    }
}

impl Category {
    /// Read a `<maintenance-category>` element's `id` and `title`
    pub fn from_attributes<F>(get: F) -> Result<Self, AttributeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            id: required(&get, ATTR_ID)?,
            title: get(ATTR_TITLE).unwrap_or_default(),
        })
    }
}

/// Split `"Leaking;Belt worn"` into its non-empty, trimmed entries
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(OPTIONS_SEPARATOR)
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

fn required<F>(get: &F, name: &'static str) -> Result<i64, AttributeError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get(name).ok_or(AttributeError::Missing(name))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AttributeError::Invalid { name, value: raw })
}

/// Accepts `true`/`false`, `1`/`0` and the empty string (present = true)
pub(crate) fn parse_flag(name: &'static str, raw: &str) -> Result<bool, AttributeError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AttributeError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}
