use shared::{Category, ImmediateChange};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CategorySectionProps {
    pub category: Category,
    pub can_remove: bool,
    pub on_immediate: Callback<ImmediateChange>,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(CategorySection)]
pub fn category_section(props: &CategorySectionProps) -> Html {
    let on_remove_click = {
        let on_immediate = props.on_immediate.clone();
        let id = props.category.id;
        Callback::from(move |_: MouseEvent| {
            on_immediate.emit(ImmediateChange::RemoveCategory(id));
        })
    };

    html! {
        <section class="category-section">
            <div class="category-header">
                <h2>{&props.category.title}</h2>
                {if props.can_remove {
                    html! {
                        <button class="btn btn-danger" onclick={on_remove_click}>
                            {"Remove category"}
                        </button>
                    }
                } else { html! {} }}
            </div>
            <div class="category-items">
                {props.children.clone()}
            </div>
        </section>
    }
}
