pub mod cli;
pub mod common;
pub mod getent;
pub mod ui;
