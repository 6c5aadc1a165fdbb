// Library surface for the binary and for headless/integration tests.
// Terminal setup and the CLI stay in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod event_log;
pub mod keymap;
pub mod runtime;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod ui;
