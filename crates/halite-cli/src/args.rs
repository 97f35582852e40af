use crate::types::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "halite")]
#[command(about = "Present JSON resources as HAL documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Schema file (defaults to $HALITE_SCHEMA, then ./halite.toml)
    #[arg(long, global = true)]
    pub schema: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Present a JSON resource (or array of resources)
    Present(PresentArgs),

    /// Validate the schema and summarize its presenters
    Check,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PresentArgs {
    /// JSON input file; reads stdin when omitted
    pub input: Option<PathBuf>,

    /// Presenter to use instead of the registered default
    #[arg(long)]
    pub presenter: Option<String>,

    /// Resource type of the top-level object(s)
    #[arg(long = "type")]
    pub resource_type: Option<String>,

    #[arg(long, conflicts_with = "no_root")]
    pub root: Option<String>,

    #[arg(long)]
    pub no_root: bool,

    /// JSON file handed to templates as the context (`{@key}`)
    #[arg(long)]
    pub context: Option<PathBuf>,

    #[arg(long)]
    pub compact: bool,
}
