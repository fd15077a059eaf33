pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod server;
pub mod store;
pub mod tools;

pub use error::{BotError, Result};
