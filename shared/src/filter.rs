//! Status filter cycling and the derived show/hide decisions.

use std::fmt;

use crate::item::ItemRecord;
use crate::Status;

/// Current filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Only(Status),
}

impl FilterSelection {
    /// All -> OK -> Warning -> Stopped -> All
    pub fn next(self) -> Self {
        match self {
            FilterSelection::All => FilterSelection::Only(Status::Ok),
            FilterSelection::Only(Status::Stopped) => FilterSelection::All,
            FilterSelection::Only(status) => FilterSelection::Only(status.next()),
        }
    }

    pub fn matches(self, status: Status) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Only(selected) => selected == status,
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelection::All => f.write_str("All"),
            FilterSelection::Only(status) => write!(f, "{}", status),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterController {
    selection: FilterSelection,
}

impl FilterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> FilterSelection {
        self.selection
    }

    /// Move to the next selection and return it
    pub fn advance(&mut self) -> FilterSelection {
        self.selection = self.selection.next();
        tracing::debug!(selection = %self.selection, "status filter changed");
        self.selection
    }

    /// Whether an item belongs on screen under the current selection.
    ///
    /// Removed items never show. Dirty items always show so in-progress
    /// edits do not vanish when the filter changes.
    pub fn should_display(&self, item: &ItemRecord) -> bool {
        if item.removed() {
            return false;
        }
        item.is_dirty() || self.selection.matches(item.status())
    }

    /// Categories are shown when they hold a displayed item. Empty
    /// categories stay visible only while unfiltered.
    pub fn should_display_category(&self, displayed_items: usize) -> bool {
        displayed_items > 0 || self.selection == FilterSelection::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_set::ChangeSet;

    #[test]
    fn test_selection_cycles_through_four_states() {
        let mut filter = FilterController::new();
        assert_eq!(filter.selection(), FilterSelection::All);
        assert_eq!(filter.advance(), FilterSelection::Only(Status::Ok));
        assert_eq!(filter.advance(), FilterSelection::Only(Status::Warning));
        assert_eq!(filter.advance(), FilterSelection::Only(Status::Stopped));
        assert_eq!(filter.advance(), FilterSelection::All);
    }

    #[test]
    fn test_display_matches_status() {
        let mut filter = FilterController::new();
        let ok = ItemRecord::new(1, "Pump", 1, Status::Ok, 0, "", true);
        let stopped = ItemRecord::new(2, "Belt", 1, Status::Stopped, 0, "", true);

        assert!(filter.should_display(&ok));
        assert!(filter.should_display(&stopped));

        filter.advance();
        assert!(filter.should_display(&ok));
        assert!(!filter.should_display(&stopped));
    }

    #[test]
    fn test_dirty_item_survives_filter() {
        let mut filter = FilterController::new();
        let mut changes = ChangeSet::new();
        let mut item = ItemRecord::new(1, "Pump", 1, Status::Ok, 0, "", true);
        item.update_note("check seals", &mut changes);

        filter.advance();
        filter.advance();
        assert_eq!(filter.selection(), FilterSelection::Only(Status::Warning));
        assert!(filter.should_display(&item));
    }

    #[test]
    fn test_removed_item_never_displays() {
        let filter = FilterController::new();
        let mut item = ItemRecord::new(1, "Pump", 1, Status::Ok, 0, "", true);
        item.mark_removed();
        assert!(!filter.should_display(&item));
    }

    #[test]
    fn test_empty_category_hidden_only_when_filtered() {
        let mut filter = FilterController::new();
        assert!(filter.should_display_category(0));
        filter.advance();
        assert!(!filter.should_display_category(0));
        assert!(filter.should_display_category(2));
    }
}
