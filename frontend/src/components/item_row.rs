use shared::{Category, CategoryId, ImmediateChange, ItemCapabilities, ItemId, ItemRecord, Status};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ItemRowProps {
    pub item: ItemRecord,
    /// Categories the item may be moved to
    pub categories: Vec<Category>,
    /// Status description select entries
    pub status_descriptions: Vec<String>,
    pub capabilities: ItemCapabilities,
    pub currency_symbol: String,

    pub on_cycle_status: Callback<ItemId>,
    pub on_status_description_change: Callback<(ItemId, String)>,
    pub on_note_change: Callback<(ItemId, String)>,
    pub on_cost_change: Callback<(ItemId, String)>,
    pub on_immediate: Callback<ImmediateChange>,
}

#[function_component(ItemRow)]
pub fn item_row(props: &ItemRowProps) -> Html {
    let item = &props.item;
    let id = item.id();

    let on_status_click = {
        let on_cycle_status = props.on_cycle_status.clone();
        Callback::from(move |_: MouseEvent| on_cycle_status.emit(id))
    };

    let on_status_description = {
        let on_change = props.on_status_description_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_change.emit((id, select.value()));
        })
    };

    let on_cost_input = {
        let on_cost_change = props.on_cost_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_cost_change.emit((id, input.value()));
        })
    };

    let on_note_input = {
        let on_note_change = props.on_note_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            on_note_change.emit((id, input.value()));
        })
    };

    let on_visible_change = {
        let on_immediate = props.on_immediate.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_immediate.emit(ImmediateChange::SetVisible {
                item: id,
                visible: input.checked(),
            });
        })
    };

    let on_category_change = {
        let on_immediate = props.on_immediate.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(category) = select.value().parse::<CategoryId>() {
                on_immediate.emit(ImmediateChange::SetCategory { item: id, category });
            }
        })
    };

    let on_remove_click = {
        let on_immediate = props.on_immediate.clone();
        Callback::from(move |_: MouseEvent| on_immediate.emit(ImmediateChange::RemoveItem(id)))
    };

    let status_class = match item.status() {
        Status::Ok => "status status-ok",
        Status::Warning => "status status-warning",
        Status::Stopped => "status status-stopped",
    };

    html! {
        <div class={classes!("item-row", item.is_dirty().then_some("dirty"))}>
            <button class={status_class} onclick={on_status_click} title="Change status">
                {item.status().label()}
            </button>
            <span class="item-title">{item.title()}</span>

            {if props.capabilities.options && !props.status_descriptions.is_empty() {
                html! {
                    <select class="item-status-description" onchange={on_status_description}>
                        {for props.status_descriptions.iter().map(|choice| {
                            html! {
                                <option
                                    value={choice.clone()}
                                    selected={choice == item.status_description()}
                                >
                                    {choice}
                                </option>
                            }
                        })}
                    </select>
                }
            } else { html! {} }}

            <label class="item-cost">
                <span class="currency">{&props.currency_symbol}</span>
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    value={item.cost_input().to_string()}
                    oninput={on_cost_input}
                />
            </label>

            <textarea
                class="item-note"
                value={item.note().to_string()}
                oninput={on_note_input}
            />

            <label class="item-visible">
                <input type="checkbox" checked={item.visible()} onchange={on_visible_change} />
                {"Visible"}
            </label>

            {if props.capabilities.category_change && !props.categories.is_empty() {
                html! {
                    <select class="item-category" onchange={on_category_change}>
                        {for props.categories.iter().map(|category| {
                            html! {
                                <option
                                    value={category.id.to_string()}
                                    selected={category.id == item.category_id()}
                                >
                                    {&category.title}
                                </option>
                            }
                        })}
                    </select>
                }
            } else { html! {} }}

            {if props.capabilities.removal {
                html! {
                    <button class="btn btn-danger remove-btn" onclick={on_remove_click}>
                        {"Remove"}
                    </button>
                }
            } else { html! {} }}
        </div>
    }
}
