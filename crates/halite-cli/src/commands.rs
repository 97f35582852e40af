use super::args::{Cli, Commands};
use super::handlers;
use crate::config::{SchemaConfig, resolve_schema_path};
use crate::schema::LoadedSchema;
use crate::types::LogLevel;
use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let source = resolve_schema_path(cli.schema.as_deref());
    debug!(path = %source.path().display(), "loading schema");
    let config = SchemaConfig::load(&source)?;
    let schema = LoadedSchema::build(&config)
        .with_context(|| format!("Invalid schema: {}", source.path().display()))?;

    match cli.command {
        Commands::Present(args) => handlers::present::handle(&schema, &args),
        Commands::Check => handlers::check::handle(&schema),
    }
}

/// Logs go to stderr; RUST_LOG overrides `--log-level`.
fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
