pub mod api;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod domain;
pub mod reporter;
pub mod state;
pub mod sync;
pub mod tui;
pub mod version;
