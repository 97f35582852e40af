mod args;
mod commands;
pub mod config;
mod handlers;
pub mod schema;
pub mod template;
pub mod types;

pub use args::{Cli, Commands, PresentArgs};
pub use commands::run;
