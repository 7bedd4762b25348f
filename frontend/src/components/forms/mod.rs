pub mod create_category_form;
pub mod create_item_form;

pub use create_category_form::CreateCategoryForm;
pub use create_item_form::CreateItemForm;
