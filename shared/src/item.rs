//! A single maintenance item and its dirty tracking.
//!
//! Dirtiness is a value comparison against the last-saved [`Baseline`]:
//! editing a field and then restoring it makes the item clean again. The
//! record keeps a cached flag so that it joins or leaves the [`ChangeSet`]
//! exactly once per transition.

use crate::attributes::ItemAttributes;
use crate::change_set::ChangeSet;
use crate::error::MoneyError;
use crate::money::{format_money, parse_money};
use crate::attributes::DEFAULT_STATUS_DESCRIPTION;
use crate::{CategoryId, ItemDetails, ItemId, ItemPayload, Status};

/// Status description choice that is always offered last
pub const OTHER_STATUS_DESCRIPTION: &str = "Other";

/// Field values as of the last successful sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub status: Status,
    pub status_description: String,
    /// Repair cost in cents
    pub cost: u64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    id: ItemId,
    title: String,
    category_id: CategoryId,
    status: Status,
    status_description: String,
    /// Repair cost exactly as typed by the user
    cost_input: String,
    note: String,
    visible: bool,
    removed: bool,
    /// Server-provided status description choices
    options: Vec<String>,
    baseline: Baseline,
    dirty: bool,
}

impl ItemRecord {
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        category_id: CategoryId,
        status: Status,
        cost: u64,
        note: impl Into<String>,
        visible: bool,
    ) -> Self {
        let note = note.into();
        Self {
            id,
            title: title.into(),
            category_id,
            status,
            status_description: DEFAULT_STATUS_DESCRIPTION.to_string(),
            cost_input: format_money(cost),
            note: note.clone(),
            visible,
            removed: false,
            options: Vec::new(),
            baseline: Baseline {
                status,
                status_description: DEFAULT_STATUS_DESCRIPTION.to_string(),
                cost,
                note,
            },
            dirty: false,
        }
    }

    /// Build a clean record from the server-rendered page-load attributes
    pub fn from_attributes(attributes: ItemAttributes) -> Self {
        let mut item = Self::new(
            attributes.id,
            attributes.title,
            attributes.category_id,
            attributes.status,
            attributes.cost,
            attributes.note,
            attributes.visible,
        );
        item.status_description = attributes.status_description.clone();
        item.baseline.status_description = attributes.status_description;
        item.options = attributes.options;
        item
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_description(&self) -> &str {
        &self.status_description
    }

    pub fn cost_input(&self) -> &str {
        &self.cost_input
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn removed(&self) -> bool {
        self.removed
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Entries for the status description select, without duplicates:
    /// the saved and current descriptions, `OK`, the server's options, then
    /// `Other`
    pub fn status_description_choices(&self) -> Vec<String> {
        let mut choices: Vec<String> = Vec::new();
        let candidates = [
            self.baseline.status_description.as_str(),
            self.status_description.as_str(),
            DEFAULT_STATUS_DESCRIPTION,
        ]
        .into_iter()
        .chain(self.options.iter().map(String::as_str))
        .chain(std::iter::once(OTHER_STATUS_DESCRIPTION));

        for choice in candidates {
            if !choices.iter().any(|c| c == choice) {
                choices.push(choice.to_string());
            }
        }
        choices
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Cached dirty flag, kept in step with the change set
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Pure value comparison of the tracked fields against the baseline.
    ///
    /// A cost that does not parse can never equal the baseline.
    pub fn differs_from_baseline(&self) -> bool {
        self.status != self.baseline.status
            || self.status_description != self.baseline.status_description
            || self.note != self.baseline.note
            || self.cost_cents().map_or(true, |cost| cost != self.baseline.cost)
    }

    pub fn cost_cents(&self) -> Result<u64, MoneyError> {
        parse_money(&self.cost_input)
    }

    /// Advance the status one step around the cycle
    pub fn update_status(&mut self, changes: &mut ChangeSet) {
        self.status = self.status.next();
        self.recompute_dirty(changes);
    }

    pub fn update_status_description(&mut self, text: impl Into<String>, changes: &mut ChangeSet) {
        self.status_description = text.into();
        self.recompute_dirty(changes);
    }

    pub fn update_note(&mut self, text: impl Into<String>, changes: &mut ChangeSet) {
        self.note = text.into();
        self.recompute_dirty(changes);
    }

    pub fn update_cost(&mut self, text: impl Into<String>, changes: &mut ChangeSet) {
        self.cost_input = text.into();
        self.recompute_dirty(changes);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_category(&mut self, category_id: CategoryId) {
        self.category_id = category_id;
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn to_sync_payload(&self) -> Result<ItemPayload, MoneyError> {
        Ok(ItemPayload {
            id: self.id,
            title: self.title.clone(),
            category_id: self.category_id,
            details: ItemDetails {
                status: self.status,
                status_description: self.status_description.clone(),
                cost: self.cost_cents()?,
                note: self.note.clone(),
                visible: self.visible,
                removed: self.removed,
            },
        })
    }

    /// Adopt the values the server just accepted as the new baseline.
    ///
    /// Edits made after `sent` was captured keep the item dirty.
    pub fn mark_saved(&mut self, sent: &ItemDetails, changes: &mut ChangeSet) {
        self.baseline = Baseline {
            status: sent.status,
            status_description: sent.status_description.clone(),
            cost: sent.cost,
            note: sent.note.clone(),
        };
        if self.cost_cents() == Ok(sent.cost) {
            self.cost_input = format_money(sent.cost);
        }
        self.recompute_dirty(changes);
    }

    /// Reset the baseline to whatever is current and leave the change set
    pub fn discard_tracking(&mut self, changes: &mut ChangeSet) {
        self.baseline = Baseline {
            status: self.status,
            status_description: self.status_description.clone(),
            cost: self.cost_cents().unwrap_or(self.baseline.cost),
            note: self.note.clone(),
        };
        self.dirty = false;
        changes.remove(self.id);
    }

    fn recompute_dirty(&mut self, changes: &mut ChangeSet) {
        let dirty = self.differs_from_baseline();
        if dirty == self.dirty {
            return;
        }
        self.dirty = dirty;
        if dirty {
            changes.add(self.id);
        } else {
            changes.remove(self.id);
        }
    }
}
