//! Reads the server-rendered tracker markup into a [`TrackerState`].
//!
//! The server renders one `<maintenance-tracker>` root holding
//! `<maintenance-category>` and `<maintenance-item>` elements. Their
//! attributes are the page-load contract; once read, the root is emptied
//! and handed to Yew.

use anyhow::anyhow;
use shared::{AttributeError, Category, ItemAttributes, ItemRecord, TrackerConfig, TrackerState};
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::services::logging::Logger;

const COMPONENT: &str = "page";

pub const ROOT_TAG: &str = "maintenance-tracker";
pub const CATEGORY_TAG: &str = "maintenance-category";
pub const ITEM_TAG: &str = "maintenance-item";

pub struct Page {
    pub root: Element,
    pub state: TrackerState,
}

/// Find the tracker root and read its initial state
pub fn load() -> anyhow::Result<Page> {
    let document = gloo::utils::document();
    let root = document
        .query_selector(ROOT_TAG)
        .map_err(|e| anyhow!("query for <{}> failed: {:?}", ROOT_TAG, e))?
        .ok_or_else(|| anyhow!("no <{}> element on the page", ROOT_TAG))?;

    let state = read_state(&root)?;
    root.set_inner_html("");
    Ok(Page { root, state })
}

/// Read the config, categories and items under `root`.
///
/// An element with malformed attributes is logged and left out so that one
/// bad row does not take down the whole tracker.
pub fn read_state(root: &Element) -> anyhow::Result<TrackerState> {
    let config = TrackerConfig::from_attributes(|name| root.get_attribute(name));

    let categories = children(root, CATEGORY_TAG)?
        .iter()
        .filter_map(|element| skip_malformed(element, read_category(element)))
        .collect();

    let items = children(root, ITEM_TAG)?
        .iter()
        .filter_map(|element| skip_malformed(element, read_item(element)))
        .collect();

    Ok(TrackerState::new(config, categories, items))
}

pub fn read_category(element: &Element) -> Result<Category, AttributeError> {
    Category::from_attributes(|name| element.get_attribute(name))
}

pub fn read_item(element: &Element) -> Result<ItemRecord, AttributeError> {
    let note = element.text_content().unwrap_or_default();
    let attributes = ItemAttributes::parse(|name| element.get_attribute(name), note.trim())?;
    Ok(ItemRecord::from_attributes(attributes))
}

fn skip_malformed<T>(element: &Element, result: Result<T, AttributeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            let id = element.get_attribute("id").unwrap_or_default();
            Logger::warn_with_component(
                COMPONENT,
                &format!("skipping <{} id=\"{}\">: {}", element.local_name(), id, e),
            );
            None
        }
    }
}

fn children(root: &Element, selector: &str) -> anyhow::Result<Vec<Element>> {
    let nodes = root
        .query_selector_all(selector)
        .map_err(|e| anyhow!("query for <{}> failed: {:?}", selector, e))?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
