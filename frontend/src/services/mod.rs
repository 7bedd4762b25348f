pub mod api;
pub mod logging;
pub mod page;
