pub mod category_section;
pub mod forms;
pub mod item_row;
pub mod toolbar;

pub use category_section::CategorySection;
pub use item_row::ItemRow;
pub use toolbar::Toolbar;
