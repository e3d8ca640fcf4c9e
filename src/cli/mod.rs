pub mod setup;
pub mod ui;
pub mod update;
