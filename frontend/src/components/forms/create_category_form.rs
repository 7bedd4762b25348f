use shared::FormSubmission;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CreateCategoryFormProps {
    pub action: String,
    pub on_submit: Callback<FormSubmission>,
}

#[function_component(CreateCategoryForm)]
pub fn create_category_form(props: &CreateCategoryFormProps) -> Html {
    let title = use_state(String::new);
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

    let onsubmit = {
        let action = props.action.clone();
        let on_submit = props.on_submit.clone();
        let title = title.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if title.trim().is_empty() {
                form_error.set(Some("Please enter a category name".to_string()));
                return;
            }
            on_submit.emit(FormSubmission::new(action.clone()).field("title", title.trim()));
        })
    };

    html! {
        <section class="create-form">
            <h2>{"New category"}</h2>

            {if let Some(error) = (*form_error).as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form {onsubmit}>
                <div class="form-group">
                    <label for="new-category-title">{"Name"}</label>
                    <input
                        type="text"
                        id="new-category-title"
                        value={(*title).clone()}
                        onchange={on_title_change}
                    />
                </div>
                <button type="submit" class="btn btn-primary">{"Add category"}</button>
            </form>
        </section>
    }
}
