use shared::{Category, FormSubmission};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CreateItemFormProps {
    /// Action URL the form posts to
    pub action: String,
    pub categories: Vec<Category>,
    pub on_submit: Callback<FormSubmission>,
}

#[function_component(CreateItemForm)]
pub fn create_item_form(props: &CreateItemFormProps) -> Html {
    let title = use_state(String::new);
    let category_id = use_state(|| {
        props
            .categories
            .first()
            .map(|c| c.id.to_string())
            .unwrap_or_default()
    });
    let note = use_state(String::new);
    let form_error = use_state(|| Option::<String>::None);

    let on_title_change = {
        let title = title.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            title.set(input.value());
            form_error.set(None);
        })
    };

    let on_category_change = {
        let category_id = category_id.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            category_id.set(select.value());
        })
    };

    let on_note_change = {
        let note = note.clone();
        Callback::from(move |e: Event| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            note.set(input.value());
        })
    };

    let onsubmit = {
        let action = props.action.clone();
        let on_submit = props.on_submit.clone();
        let title = title.clone();
        let category_id = category_id.clone();
        let note = note.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if title.trim().is_empty() {
                form_error.set(Some("Please enter a title".to_string()));
                return;
            }
            if category_id.is_empty() {
                form_error.set(Some("Please create a category first".to_string()));
                return;
            }
            on_submit.emit(
                FormSubmission::new(action.clone())
                    .field("title", title.trim())
                    .field("category_id", (*category_id).clone())
                    .field("note", (*note).clone()),
            );
        })
    };

    html! {
        <section class="create-form">
            <h2>{"New item"}</h2>

            {if let Some(error) = (*form_error).as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form {onsubmit}>
                <div class="form-group">
                    <label for="new-item-title">{"Title"}</label>
                    <input
                        type="text"
                        id="new-item-title"
                        value={(*title).clone()}
                        onchange={on_title_change}
                    />
                </div>
                <div class="form-group">
                    <label for="new-item-category">{"Category"}</label>
                    <select id="new-item-category" onchange={on_category_change}>
                        {for props.categories.iter().map(|category| {
                            let value = category.id.to_string();
                            html! {
                                <option selected={value == *category_id} value={value.clone()}>
                                    {&category.title}
                                </option>
                            }
                        })}
                    </select>
                </div>
                <div class="form-group">
                    <label for="new-item-note">{"Note"}</label>
                    <textarea id="new-item-note" value={(*note).clone()} onchange={on_note_change} />
                </div>
                <button type="submit" class="btn btn-primary">{"Add item"}</button>
            </form>
        </section>
    }
}
