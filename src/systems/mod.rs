pub mod stadium;
pub mod ui;
