pub mod use_tracker;
