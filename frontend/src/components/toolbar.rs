use shared::FilterSelection;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub filter: FilterSelection,
    pub dirty_count: usize,
    pub saving: bool,
    pub on_filter: Callback<()>,
    pub on_save: Callback<()>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let on_filter_click = {
        let on_filter = props.on_filter.clone();
        Callback::from(move |_: MouseEvent| on_filter.emit(()))
    };

    let on_save_click = {
        let on_save = props.on_save.clone();
        Callback::from(move |_: MouseEvent| on_save.emit(()))
    };

    let filter_class = match props.filter {
        FilterSelection::All => "btn filter-btn",
        FilterSelection::Only(_) => "btn filter-btn active",
    };

    html! {
        <div class="tracker-toolbar">
            <button class={filter_class} onclick={on_filter_click}>
                {format!("Show: {}", props.filter)}
            </button>
            <button
                class="btn btn-primary save-btn"
                onclick={on_save_click}
                disabled={props.saving || props.dirty_count == 0}
            >
                {if props.saving {
                    "Saving...".to_string()
                } else if props.dirty_count == 0 {
                    "Saved".to_string()
                } else {
                    format!("Save {} change(s)", props.dirty_count)
                }}
            </button>
        </div>
    }
}
