use std::cell::RefCell;
use std::rc::Rc;

use gloo::dialogs::{alert, confirm};
use shared::{
    FormSubmission, ImmediateChange, ItemId, StateError, SyncError, TrackerState,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::{ApiClient, TrackerClient};
use crate::services::logging::Logger;

const COMPONENT: &str = "tracker-hook";

pub struct UseTrackerResult {
    pub state: Rc<RefCell<TrackerState>>,
    pub actions: UseTrackerActions,
}

#[derive(Clone, PartialEq)]
pub struct UseTrackerActions {
    pub cycle_status: Callback<ItemId>,
    pub update_status_description: Callback<(ItemId, String)>,
    pub update_note: Callback<(ItemId, String)>,
    pub update_cost: Callback<(ItemId, String)>,
    pub advance_filter: Callback<()>,
    pub save: Callback<()>,
    pub immediate: Callback<ImmediateChange>,
    pub create: Callback<FormSubmission>,
}

/// Hook owning the tracker state for the lifetime of the element.
///
/// Edits mutate the state synchronously; saves and immediate changes are
/// prepared synchronously, posted with `spawn_local` and applied when the
/// response arrives.
#[hook]
pub fn use_tracker(initial: &TrackerState) -> UseTrackerResult {
    let state = use_mut_ref(|| initial.clone());
    let update = use_force_update();
    let client = ApiClient::new(state.borrow().config().clone()).into_sync_client();

    let cycle_status = {
        let state = state.clone();
        let update = update.clone();
        Callback::from(move |id: ItemId| {
            let result = state.borrow_mut().cycle_status(id);
            report_edit(result);
            update.force_update();
        })
    };

    let update_status_description = {
        let state = state.clone();
        let update = update.clone();
        Callback::from(move |(id, text): (ItemId, String)| {
            let result = state.borrow_mut().update_status_description(id, &text);
            report_edit(result);
            update.force_update();
        })
    };

    let update_note = {
        let state = state.clone();
        let update = update.clone();
        Callback::from(move |(id, text): (ItemId, String)| {
            let result = state.borrow_mut().update_note(id, &text);
            report_edit(result);
            update.force_update();
        })
    };

    let update_cost = {
        let state = state.clone();
        let update = update.clone();
        Callback::from(move |(id, text): (ItemId, String)| {
            let result = state.borrow_mut().update_cost(id, &text);
            report_edit(result);
            update.force_update();
        })
    };

    let advance_filter = {
        let state = state.clone();
        let update = update.clone();
        Callback::from(move |_| {
            let selection = state.borrow_mut().advance_filter();
            Logger::debug_with_component(COMPONENT, &format!("filter: {}", selection));
            update.force_update();
        })
    };

    let save = {
        let state = state.clone();
        let update = update.clone();
        let client = client.clone();
        Callback::from(move |_| {
            let prepared = state.borrow_mut().prepare_batch();
            let batch = match prepared {
                Ok(batch) => batch,
                Err(StateError::NothingToSave) => return,
                Err(e) => {
                    Logger::warn_with_component(COMPONENT, &e.to_string());
                    alert(&e.to_string());
                    return;
                }
            };
            update.force_update();

            let state = state.clone();
            let update = update.clone();
            let client = client.clone();
            spawn_local(async move {
                let result = client.send_batch(&batch.payloads).await;
                report_sync(&result);
                state.borrow_mut().finish_batch(&batch, &result);
                update.force_update();
            });
        })
    };

    let immediate = {
        let state = state.clone();
        let update = update.clone();
        let client = client.clone();
        Callback::from(move |change: ImmediateChange| {
            let prepared = state.borrow().prepare_confirmed(change, |prompt| confirm(prompt));
            let pending = match prepared {
                Ok(Some(pending)) => pending,
                Ok(None) => {
                    // Declined; snap controls back
                    update.force_update();
                    return;
                }
                Err(e) => {
                    Logger::warn_with_component(COMPONENT, &e.to_string());
                    alert(&e.to_string());
                    // Snap controls back to the unchanged state
                    update.force_update();
                    return;
                }
            };

            let state = state.clone();
            let update = update.clone();
            let client = client.clone();
            spawn_local(async move {
                let result = client.send_immediate(pending.request()).await;
                report_sync(&result);
                state.borrow_mut().finish_immediate(&pending, &result);
                update.force_update();
            });
        })
    };

    let create = {
        let client = client.clone();
        Callback::from(move |form: FormSubmission| {
            let client = client.clone();
            spawn_local(async move {
                let result = client.submit_form(&form).await;
                report_sync(&result);
                if result.is_ok() {
                    // New records get their ids from the server
                    if let Err(e) = gloo::utils::window().location().reload() {
                        Logger::error_with_component(COMPONENT, &format!("reload failed: {:?}", e));
                    }
                }
            });
        })
    };

    UseTrackerResult {
        state,
        actions: UseTrackerActions {
            cycle_status,
            update_status_description,
            update_note,
            update_cost,
            advance_filter,
            save,
            immediate,
            create,
        },
    }
}

fn report_edit(result: Result<(), StateError>) {
    if let Err(e) = result {
        Logger::error_with_component(COMPONENT, &e.to_string());
    }
}

fn report_sync(result: &Result<(), SyncError>) {
    if let Err(e) = result {
        Logger::warn_with_component(COMPONENT, &e.to_string());
        alert(&e.to_string());
    }
}
