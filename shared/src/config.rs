use serde::{Deserialize, Serialize};

use crate::attributes::parse_flag;

pub const DATA_BASE_URL: &str = "data-base-url";
pub const DATA_CURRENCY: &str = "data-currency";
pub const DATA_CATEGORY_CHANGE: &str = "data-category-change";
pub const DATA_REMOVAL: &str = "data-removal";
pub const DATA_OPTIONS: &str = "data-options";
pub const DATA_CREATE_FORMS: &str = "data-create-forms";

/// Optional item capabilities a page may switch off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCapabilities {
    /// Items can be moved to another category
    pub category_change: bool,
    /// Items and categories can be soft-deleted
    pub removal: bool,
    /// Items offer their status description choices
    pub options: bool,
    /// "New item" and "new category" forms are offered
    pub create_forms: bool,
}

impl Default for ItemCapabilities {
    fn default() -> Self {
        Self {
            category_change: true,
            removal: true,
            options: true,
            create_forms: true,
        }
    }
}

/// Configuration for the tracker element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Prefix for every endpoint; empty means relative to the page
    pub base_url: String,
    pub currency_symbol: String,
    pub capabilities: ItemCapabilities,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            currency_symbol: "$".to_string(),
            capabilities: ItemCapabilities::default(),
        }
    }
}

impl TrackerConfig {
    /// Read the configuration from the root element's `data-*` attributes.
    ///
    /// Missing or unreadable values fall back to the defaults.
    pub fn from_attributes<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &'static str, default: bool| {
            get(name)
                .and_then(|raw| parse_flag(name, &raw).ok())
                .unwrap_or(default)
        };

        Self {
            base_url: get(DATA_BASE_URL).unwrap_or(defaults.base_url),
            currency_symbol: get(DATA_CURRENCY).unwrap_or(defaults.currency_symbol),
            capabilities: ItemCapabilities {
                category_change: flag(DATA_CATEGORY_CHANGE, defaults.capabilities.category_change),
                removal: flag(DATA_REMOVAL, defaults.capabilities.removal),
                options: flag(DATA_OPTIONS, defaults.capabilities.options),
                create_forms: flag(DATA_CREATE_FORMS, defaults.capabilities.create_forms),
            },
        }
    }

    /// Full URL for an endpoint path such as `update/item`
    pub fn endpoint_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.base_url.is_empty() {
            format!("/{}", path)
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), path)
        }
    }
}
