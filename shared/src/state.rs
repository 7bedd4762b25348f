//! The tracker's application state.
//!
//! `TrackerState` owns every item, the categories, the change set and the
//! filter. Network work is split in two halves so the state never lives
//! across an `await`: a `prepare_*` call validates and captures exactly what
//! will be sent, and the matching `finish_*` call applies the outcome.
//! Local state only moves forward when the server answered "OK".

use std::collections::BTreeSet;

use crate::change_set::ChangeSet;
use crate::config::TrackerConfig;
use crate::error::{StateError, SyncError};
use crate::filter::{FilterController, FilterSelection};
use crate::item::ItemRecord;
use crate::sync::SyncRequest;
use crate::{Category, CategoryId, ItemDetails, ItemId, ItemPayload};

/// A batch save that has been validated and is ready to post
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSave {
    pub payloads: Vec<ItemPayload>,
}

/// Actions that bypass the batch save and sync on their own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImmediateChange {
    SetVisible { item: ItemId, visible: bool },
    SetCategory { item: ItemId, category: CategoryId },
    RemoveItem(ItemId),
    RemoveCategory(CategoryId),
}

impl ImmediateChange {
    /// Destructive changes must be confirmed by the user first
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            ImmediateChange::RemoveItem(_) | ImmediateChange::RemoveCategory(_)
        )
    }
}

/// An immediate change captured together with the request that carries it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImmediate {
    change: ImmediateChange,
    request: SyncRequest,
    /// Item fields as sent, for update requests
    sent: Option<ItemDetails>,
}

impl PendingImmediate {
    pub fn change(&self) -> &ImmediateChange {
        &self.change
    }

    pub fn request(&self) -> &SyncRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    config: TrackerConfig,
    categories: Vec<Category>,
    items: Vec<ItemRecord>,
    changes: ChangeSet,
    filter: FilterController,
    shown: BTreeSet<ItemId>,
    saving: bool,
}

impl TrackerState {
    pub fn new(config: TrackerConfig, categories: Vec<Category>, items: Vec<ItemRecord>) -> Self {
        let mut state = Self {
            config,
            categories,
            items,
            changes: ChangeSet::new(),
            filter: FilterController::new(),
            shown: BTreeSet::new(),
            saving: false,
        };
        state.refresh_view();
        state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items_in(&self, category: CategoryId) -> impl Iterator<Item = &ItemRecord> + '_ {
        self.items
            .iter()
            .filter(move |item| item.category_id() == category && !item.removed())
    }

    pub fn change_set(&self) -> &ChangeSet {
        &self.changes
    }

    /// True while a batch save is in flight
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn filter(&self) -> FilterSelection {
        self.filter.selection()
    }

    /// Categories an item may be moved to; empty when category change is
    /// switched off or the item is unknown
    pub fn category_options(&self, id: ItemId) -> Vec<Category> {
        if !self.config.capabilities.category_change || self.item(id).is_none() {
            return Vec::new();
        }
        self.categories.clone()
    }

    /// Status description choices for an item; empty when the options list
    /// is switched off
    pub fn status_description_choices(&self, id: ItemId) -> Vec<String> {
        if !self.config.capabilities.options {
            return Vec::new();
        }
        self.item(id)
            .map(ItemRecord::status_description_choices)
            .unwrap_or_default()
    }

    pub fn cycle_status(&mut self, id: ItemId) -> Result<(), StateError> {
        self.edit(id, |item, changes| item.update_status(changes))
    }

    pub fn update_status_description(&mut self, id: ItemId, text: &str) -> Result<(), StateError> {
        if !self.config.capabilities.options {
            return Err(StateError::Unsupported("Status description"));
        }
        self.edit(id, |item, changes| item.update_status_description(text, changes))
    }

    pub fn update_note(&mut self, id: ItemId, text: &str) -> Result<(), StateError> {
        self.edit(id, |item, changes| item.update_note(text, changes))
    }

    pub fn update_cost(&mut self, id: ItemId, text: &str) -> Result<(), StateError> {
        self.edit(id, |item, changes| item.update_cost(text, changes))
    }

    /// Validate every dirty item and mark a batch save as in flight.
    ///
    /// Nothing is marked when any item fails to serialize.
    pub fn prepare_batch(&mut self) -> Result<BatchSave, StateError> {
        if self.saving {
            return Err(StateError::SaveInProgress);
        }
        if self.changes.is_empty() {
            return Err(StateError::NothingToSave);
        }

        let items = &self.items;
        let payloads = self
            .changes
            .to_payload_list(|id| items.iter().find(|item| item.id() == id))?;

        self.saving = true;
        Ok(BatchSave { payloads })
    }

    /// Apply the outcome of a batch save
    pub fn finish_batch(&mut self, batch: &BatchSave, result: &Result<(), SyncError>) {
        self.saving = false;
        if result.is_err() {
            return;
        }

        for payload in &batch.payloads {
            if let Some(item) = self.items.iter_mut().find(|item| item.id() == payload.id) {
                item.mark_saved(&payload.details, &mut self.changes);
            }
        }
        tracing::info!(saved = batch.payloads.len(), "batch save applied");
        self.refresh_view();
    }

    /// Validate an immediate change and build its request without
    /// touching local state
    pub fn prepare_immediate(&self, change: ImmediateChange) -> Result<PendingImmediate, StateError> {
        let capabilities = &self.config.capabilities;

        let (request, sent) = match &change {
            ImmediateChange::SetVisible { item, visible } => {
                let mut draft = self.item(*item).ok_or(StateError::UnknownItem(*item))?.clone();
                draft.set_visible(*visible);
                self.update_request(&draft)?
            }
            ImmediateChange::SetCategory { item, category } => {
                if !capabilities.category_change {
                    return Err(StateError::Unsupported("Category change"));
                }
                let mut draft = self.item(*item).ok_or(StateError::UnknownItem(*item))?.clone();
                if !self.category_options(*item).iter().any(|c| c.id == *category) {
                    return Err(StateError::UnknownCategory(*category));
                }
                draft.set_category(*category);
                self.update_request(&draft)?
            }
            ImmediateChange::RemoveItem(item) => {
                if !capabilities.removal {
                    return Err(StateError::Unsupported("Removal"));
                }
                self.item(*item).ok_or(StateError::UnknownItem(*item))?;
                (SyncRequest::delete_item(*item), None)
            }
            ImmediateChange::RemoveCategory(category) => {
                if !capabilities.removal {
                    return Err(StateError::Unsupported("Removal"));
                }
                if !self.categories.iter().any(|c| c.id == *category) {
                    return Err(StateError::UnknownCategory(*category));
                }
                (SyncRequest::delete_category(*category), None)
            }
        };

        Ok(PendingImmediate {
            change,
            request,
            sent,
        })
    }

    /// Question to put to the user before a destructive change, `None` when
    /// the change needs no confirmation
    pub fn confirmation_prompt(&self, change: &ImmediateChange) -> Option<String> {
        match change {
            ImmediateChange::RemoveItem(id) => {
                let title = self.item(*id).map(ItemRecord::title).unwrap_or_default();
                Some(format!("Remove \"{}\"?", title))
            }
            ImmediateChange::RemoveCategory(id) => {
                let title = self
                    .categories
                    .iter()
                    .find(|c| c.id == *id)
                    .map(|c| c.title.as_str())
                    .unwrap_or_default();
                Some(format!(
                    "Remove category \"{}\" and all of its items?",
                    title
                ))
            }
            ImmediateChange::SetVisible { .. } | ImmediateChange::SetCategory { .. } => None,
        }
    }

    /// Ask `confirm` about destructive changes before preparing them.
    ///
    /// A declined change yields `Ok(None)`: no request is built and the state
    /// is untouched.
    pub fn prepare_confirmed<C>(
        &self,
        change: ImmediateChange,
        confirm: C,
    ) -> Result<Option<PendingImmediate>, StateError>
    where
        C: FnOnce(&str) -> bool,
    {
        if let Some(prompt) = self.confirmation_prompt(&change) {
            if !confirm(&prompt) {
                tracing::debug!(change = ?change, "change declined");
                return Ok(None);
            }
        }
        self.prepare_immediate(change).map(Some)
    }

    /// Apply the outcome of an immediate change.
    ///
    /// An update request carries every current field of the item, so any
    /// pending edits it had were saved with it and the item leaves the
    /// change set. A removed item's pending edits are dropped with it.
    pub fn finish_immediate(&mut self, pending: &PendingImmediate, result: &Result<(), SyncError>) {
        if result.is_err() {
            return;
        }

        match &pending.change {
            ImmediateChange::SetVisible { item, visible } => {
                if let Some(record) = self.items.iter_mut().find(|i| i.id() == *item) {
                    record.set_visible(*visible);
                    if let Some(sent) = &pending.sent {
                        record.mark_saved(sent, &mut self.changes);
                    }
                }
            }
            ImmediateChange::SetCategory { item, category } => {
                if let Some(record) = self.items.iter_mut().find(|i| i.id() == *item) {
                    record.set_category(*category);
                    if let Some(sent) = &pending.sent {
                        record.mark_saved(sent, &mut self.changes);
                    }
                }
            }
            ImmediateChange::RemoveItem(item) => {
                if let Some(record) = self.items.iter_mut().find(|i| i.id() == *item) {
                    record.mark_removed();
                    record.discard_tracking(&mut self.changes);
                }
            }
            ImmediateChange::RemoveCategory(category) => {
                for record in self
                    .items
                    .iter_mut()
                    .filter(|i| i.category_id() == *category)
                {
                    record.mark_removed();
                    record.discard_tracking(&mut self.changes);
                }
                self.categories.retain(|c| c.id != *category);
            }
        }
        tracing::info!(change = ?pending.change, "immediate change applied");
        self.refresh_view();
    }

    /// Step the status filter and recompute what is shown
    pub fn advance_filter(&mut self) -> FilterSelection {
        let selection = self.filter.advance();
        self.refresh_view();
        selection
    }

    /// Recompute the displayed items from the current filter
    pub fn refresh_view(&mut self) {
        let filter = &self.filter;
        self.shown = self
            .items
            .iter()
            .filter(|item| filter.should_display(item))
            .map(ItemRecord::id)
            .collect();
    }

    pub fn is_item_shown(&self, id: ItemId) -> bool {
        self.shown.contains(&id)
    }

    pub fn is_category_shown(&self, category: CategoryId) -> bool {
        let displayed = self
            .items_in(category)
            .filter(|item| self.shown.contains(&item.id()))
            .count();
        self.filter.should_display_category(displayed)
    }

    fn edit<F>(&mut self, id: ItemId, f: F) -> Result<(), StateError>
    where
        F: FnOnce(&mut ItemRecord, &mut ChangeSet),
    {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StateError::UnknownItem(id))?;
        f(item, &mut self.changes);
        Ok(())
    }

    fn update_request(
        &self,
        draft: &ItemRecord,
    ) -> Result<(SyncRequest, Option<ItemDetails>), StateError> {
        let payload = draft
            .to_sync_payload()
            .map_err(|source| StateError::InvalidAmount {
                title: draft.title().to_string(),
                source,
            })?;
        let request = SyncRequest::update_item(&payload)?;
        Ok((request, Some(payload.details)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::RecordingTransport;
    use crate::sync::{Endpoint, SyncClient};
    use crate::Status;
    use serde_json::json;

    fn state() -> TrackerState {
        let categories = vec![
            Category { id: 1, title: "Workshop".to_string() },
            Category { id: 2, title: "Yard".to_string() },
        ];
        let items = vec![
            ItemRecord::new(1, "Boiler", 1, Status::Ok, 500, "ok", true),
            ItemRecord::new(2, "Lathe", 1, Status::Warning, 0, "", true),
            ItemRecord::new(3, "Gate", 2, Status::Stopped, 12000, "motor burnt", false),
        ];
        TrackerState::new(TrackerConfig::default(), categories, items)
    }

    #[test]
    fn test_clean_items_are_never_in_change_set() {
        let mut state = state();
        assert!(state.change_set().is_empty());

        state.update_note(1, "ok").unwrap();
        state.update_cost(2, "0").unwrap();
        assert!(state.change_set().is_empty());
    }

    #[test]
    fn test_cost_edit_scenario() {
        let mut state = state();
        state.update_cost(1, "7.25").unwrap();
        assert!(state.item(1).unwrap().is_dirty());

        let batch = state.prepare_batch().unwrap();
        assert_eq!(batch.payloads[0].details.cost, 725);
        state.finish_batch(&batch, &Err(SyncError::Transport("offline".to_string())));

        state.update_cost(1, "5.00").unwrap();
        assert!(!state.item(1).unwrap().is_dirty());
        assert!(state.change_set().is_empty());
    }

    #[test]
    fn test_unknown_item_is_reported() {
        let mut state = state();
        assert_eq!(state.cycle_status(99), Err(StateError::UnknownItem(99)));
    }

    #[test]
    fn test_prepare_batch_requires_changes() {
        let mut state = state();
        assert_eq!(state.prepare_batch(), Err(StateError::NothingToSave));
        assert!(!state.is_saving());
    }

    #[test]
    fn test_invalid_cost_aborts_whole_batch() {
        let mut state = state();
        state.update_note(2, "squeaks").unwrap();
        state.update_cost(1, "12,50").unwrap();

        match state.prepare_batch() {
            Err(StateError::InvalidAmount { title, .. }) => assert_eq!(title, "Boiler"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!state.is_saving());
        assert_eq!(state.change_set().len(), 2);
    }

    #[test]
    fn test_second_batch_refused_while_in_flight() {
        let mut state = state();
        state.cycle_status(1).unwrap();
        let batch = state.prepare_batch().unwrap();
        assert!(state.is_saving());
        assert_eq!(state.prepare_batch(), Err(StateError::SaveInProgress));

        state.finish_batch(&batch, &Ok(()));
        assert!(!state.is_saving());
        assert!(state.change_set().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_batch_leaves_items_dirty() {
        let mut state = state();
        state.update_note(1, "leaking").unwrap();

        let client = SyncClient::new(RecordingTransport::replying(vec![Ok(
            "Invalid category".to_string(),
        )]));
        let batch = state.prepare_batch().unwrap();
        let result = client.send_batch(&batch.payloads).await;
        assert_eq!(result, Err(SyncError::Rejected("Invalid category".to_string())));

        state.finish_batch(&batch, &result);
        assert!(state.item(1).unwrap().is_dirty());
        assert!(state.change_set().contains(1));
        assert_eq!(state.item(1).unwrap().baseline().note, "ok");
        assert!(!state.is_saving());
    }

    #[tokio::test]
    async fn test_accepted_batch_resets_baselines() {
        let mut state = state();
        state.update_note(1, "leaking").unwrap();
        state.cycle_status(2).unwrap();

        let client = SyncClient::new(RecordingTransport::default());
        let batch = state.prepare_batch().unwrap();
        let result = client.send_batch(&batch.payloads).await;
        state.finish_batch(&batch, &result);

        assert!(state.change_set().is_empty());
        assert_eq!(state.item(1).unwrap().baseline().note, "leaking");
        assert_eq!(state.item(2).unwrap().baseline().status, Status::Stopped);
    }

    #[test]
    fn test_edit_during_flight_stays_dirty() {
        let mut state = state();
        state.update_note(1, "first").unwrap();
        let batch = state.prepare_batch().unwrap();
        state.update_note(1, "second").unwrap();

        state.finish_batch(&batch, &Ok(()));
        assert!(state.change_set().contains(1));
        assert_eq!(state.item(1).unwrap().baseline().note, "first");
    }

    #[test]
    fn test_dirty_item_stays_visible_under_filter() {
        let mut state = state();
        state.update_note(1, "needs valve").unwrap();

        state.advance_filter();
        assert_eq!(state.advance_filter(), FilterSelection::Only(Status::Warning));

        assert!(state.is_item_shown(1));
        assert!(state.is_item_shown(2));
        assert!(!state.is_item_shown(3));
        assert!(state.is_category_shown(1));
        assert!(!state.is_category_shown(2));
    }

    #[test]
    fn test_batch_save_refreshes_filtered_view() {
        let mut state = state();
        state.advance_filter();
        state.advance_filter();
        state.update_note(2, "oiled").unwrap();
        state.cycle_status(2).unwrap();
        assert!(state.is_item_shown(2));

        let batch = state.prepare_batch().unwrap();
        state.finish_batch(&batch, &Ok(()));
        assert!(!state.is_item_shown(2));
        assert!(!state.is_category_shown(1));
    }

    #[test]
    fn test_visibility_change_applies_only_after_ok() {
        let mut state = state();
        let pending = state
            .prepare_immediate(ImmediateChange::SetVisible { item: 3, visible: true })
            .unwrap();
        assert_eq!(pending.request().endpoint, Endpoint::UpdateItem);
        assert_eq!(pending.request().body["details"]["visible"], json!(true));
        assert!(!state.item(3).unwrap().visible());

        state.finish_immediate(&pending, &Err(SyncError::Rejected("nope".to_string())));
        assert!(!state.item(3).unwrap().visible());

        state.finish_immediate(&pending, &Ok(()));
        assert!(state.item(3).unwrap().visible());
    }

    #[test]
    fn test_immediate_update_carries_pending_edits() {
        let mut state = state();
        state.update_note(1, "leaking").unwrap();

        let pending = state
            .prepare_immediate(ImmediateChange::SetCategory { item: 1, category: 2 })
            .unwrap();
        assert_eq!(pending.request().body["details"]["note"], json!("leaking"));
        assert_eq!(pending.request().body["category_id"], json!(2));

        state.finish_immediate(&pending, &Ok(()));
        assert!(state.change_set().is_empty());
        assert_eq!(state.item(1).unwrap().category_id(), 2);
        assert_eq!(state.item(1).unwrap().baseline().note, "leaking");
    }

    #[test]
    fn test_immediate_update_refuses_bad_cost() {
        let mut state = state();
        state.update_cost(1, "x").unwrap();
        let err = state
            .prepare_immediate(ImmediateChange::SetVisible { item: 1, visible: false })
            .unwrap_err();
        assert!(matches!(err, StateError::InvalidAmount { .. }));
        assert!(state.change_set().contains(1));
    }

    #[test]
    fn test_unknown_category_is_refused() {
        let state = state();
        assert_eq!(
            state.prepare_immediate(ImmediateChange::SetCategory { item: 1, category: 9 }),
            Err(StateError::UnknownCategory(9))
        );
    }

    #[test]
    fn test_remove_item_drops_pending_edits() {
        let mut state = state();
        state.update_note(2, "scrap it").unwrap();

        let change = ImmediateChange::RemoveItem(2);
        assert!(change.needs_confirmation());
        let pending = state.prepare_immediate(change).unwrap();
        assert_eq!(pending.request().body, json!(2));

        state.finish_immediate(&pending, &Ok(()));
        assert!(state.item(2).unwrap().removed());
        assert!(!state.is_item_shown(2));
        assert!(state.change_set().is_empty());
    }

    #[test]
    fn test_remove_category_removes_its_items() {
        let mut state = state();
        let pending = state
            .prepare_immediate(ImmediateChange::RemoveCategory(2))
            .unwrap();
        state.finish_immediate(&pending, &Ok(()));

        assert_eq!(state.categories().len(), 1);
        assert!(state.item(3).unwrap().removed());
        assert_eq!(state.items_in(2).count(), 0);
    }

    #[test]
    fn test_disabled_capabilities_are_refused() {
        let mut config = TrackerConfig::default();
        config.capabilities.removal = false;
        config.capabilities.category_change = false;
        let state = TrackerState::new(
            config,
            vec![Category { id: 1, title: "Workshop".to_string() }],
            vec![ItemRecord::new(1, "Boiler", 1, Status::Ok, 0, "", true)],
        );

        assert_eq!(
            state.prepare_immediate(ImmediateChange::RemoveItem(1)),
            Err(StateError::Unsupported("Removal"))
        );
        assert_eq!(
            state.prepare_immediate(ImmediateChange::SetCategory { item: 1, category: 1 }),
            Err(StateError::Unsupported("Category change"))
        );
    }

    #[test]
    fn test_category_options_follow_capability() {
        let state = state();
        assert_eq!(state.category_options(1).len(), 2);
        assert!(state.category_options(99).is_empty());

        let mut config = TrackerConfig::default();
        config.capabilities.category_change = false;
        let state = TrackerState::new(config, state.categories().to_vec(), state.items().to_vec());
        assert!(state.category_options(1).is_empty());
    }

    #[test]
    fn test_status_description_edit_is_batched() {
        let mut state = state();
        assert_eq!(state.status_description_choices(1), vec!["OK", "Other"]);

        state.update_status_description(1, "Other").unwrap();
        assert!(state.change_set().contains(1));

        let batch = state.prepare_batch().unwrap();
        let body = SyncRequest::batch(&batch.payloads).unwrap().body;
        assert_eq!(body[0]["details"]["statdesc"], json!("Other"));

        state.finish_batch(&batch, &Ok(()));
        assert_eq!(state.item(1).unwrap().baseline().status_description, "Other");
        assert!(state.change_set().is_empty());
    }

    #[test]
    fn test_options_capability_gates_status_descriptions() {
        let mut config = TrackerConfig::default();
        config.capabilities.options = false;
        let mut state = TrackerState::new(
            config,
            vec![Category { id: 1, title: "Workshop".to_string() }],
            vec![ItemRecord::new(1, "Boiler", 1, Status::Ok, 0, "", true)],
        );

        assert!(state.status_description_choices(1).is_empty());
        assert_eq!(
            state.update_status_description(1, "Leaking"),
            Err(StateError::Unsupported("Status description"))
        );
        assert!(state.change_set().is_empty());
    }

    #[test]
    fn test_confirmation_prompts() {
        let state = state();
        assert_eq!(
            state.confirmation_prompt(&ImmediateChange::RemoveItem(2)).as_deref(),
            Some("Remove \"Lathe\"?")
        );
        assert_eq!(
            state.confirmation_prompt(&ImmediateChange::RemoveCategory(2)).as_deref(),
            Some("Remove category \"Yard\" and all of its items?")
        );
        assert_eq!(
            state.confirmation_prompt(&ImmediateChange::SetVisible { item: 1, visible: false }),
            None
        );
    }

    #[tokio::test]
    async fn test_declined_removal_sends_nothing() {
        let mut state = state();
        state.update_note(2, "scrap it").unwrap();
        let before = state.clone();
        let client = SyncClient::new(RecordingTransport::default());

        let mut asked = Vec::new();
        let prepared = state
            .prepare_confirmed(ImmediateChange::RemoveCategory(1), |prompt| {
                asked.push(prompt.to_string());
                false
            })
            .unwrap();
        if let Some(pending) = &prepared {
            let result = client.send_immediate(pending.request()).await;
            state.finish_immediate(pending, &result);
        }

        assert!(prepared.is_none());
        assert_eq!(asked, vec!["Remove category \"Workshop\" and all of its items?"]);
        assert!(client.transport().sent.borrow().is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_confirmed_removal_is_prepared() {
        let state = state();
        let pending = state
            .prepare_confirmed(ImmediateChange::RemoveItem(2), |_| true)
            .unwrap()
            .unwrap();
        assert_eq!(pending.request().endpoint, Endpoint::DeleteItem);
        assert!(!state.item(2).unwrap().removed());
    }

    #[test]
    fn test_non_destructive_change_skips_confirmation() {
        let state = state();
        let pending = state
            .prepare_confirmed(ImmediateChange::SetVisible { item: 1, visible: false }, |_| {
                panic!("visibility changes are not confirmed")
            })
            .unwrap();
        assert!(pending.is_some());
    }
}
