pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod exit;
pub mod input;
pub mod logging;
pub mod rules;
pub mod ui;

pub use engine::run_assessment;
