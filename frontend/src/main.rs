use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::forms::{CreateCategoryForm, CreateItemForm};
use components::{CategorySection, ItemRow, Toolbar};
use hooks::use_tracker::use_tracker;
use services::logging::Logger;
use shared::TrackerState;

const CREATE_ITEM_ACTION: &str = "create/item";
const CREATE_CATEGORY_ACTION: &str = "create/category";

#[derive(Properties, PartialEq)]
struct AppProps {
    initial: TrackerState,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let tracker = use_tracker(&props.initial);
    let actions = tracker.actions.clone();
    let state = tracker.state.borrow();
    let config = state.config();
    let capabilities = &config.capabilities;

    html! {
        <div class="maintenance-tracker">
            <Toolbar
                filter={state.filter()}
                dirty_count={state.change_set().len()}
                saving={state.is_saving()}
                on_filter={actions.advance_filter.clone()}
                on_save={actions.save.clone()}
            />

            {for state
                .categories()
                .iter()
                .filter(|category| state.is_category_shown(category.id))
                .map(|category| {
                    html! {
                        <CategorySection
                            key={category.id}
                            category={category.clone()}
                            can_remove={capabilities.removal}
                            on_immediate={actions.immediate.clone()}
                        >
                            {for state
                                .items_in(category.id)
                                .filter(|item| state.is_item_shown(item.id()))
                                .map(|item| html! {
                                    <ItemRow
                                        key={item.id()}
                                        item={item.clone()}
                                        categories={state.category_options(item.id())}
                                        status_descriptions={state.status_description_choices(item.id())}
                                        capabilities={capabilities.clone()}
                                        currency_symbol={config.currency_symbol.clone()}
                                        on_cycle_status={actions.cycle_status.clone()}
                                        on_status_description_change={actions.update_status_description.clone()}
                                        on_note_change={actions.update_note.clone()}
                                        on_cost_change={actions.update_cost.clone()}
                                        on_immediate={actions.immediate.clone()}
                                    />
                                })}
                        </CategorySection>
                    }
                })}

            {if capabilities.create_forms {
                html! {
                    <div class="create-forms">
                        <CreateItemForm
                            action={CREATE_ITEM_ACTION}
                            categories={state.categories().to_vec()}
                            on_submit={actions.create.clone()}
                        />
                        <CreateCategoryForm
                            action={CREATE_CATEGORY_ACTION}
                            on_submit={actions.create.clone()}
                        />
                    </div>
                }
            } else { html! {} }}
        </div>
    }
}

fn main() {
    services::logging::init_tracing();
    match services::page::load() {
        Ok(page) => {
            Logger::info_with_component(
                "bootstrap",
                &format!("loaded {} items", page.state.items().len()),
            );
            yew::Renderer::<App>::with_root_and_props(page.root, AppProps { initial: page.state })
                .render();
        }
        Err(e) => Logger::error_with_component("bootstrap", &format!("{:#}", e)),
    }
}
