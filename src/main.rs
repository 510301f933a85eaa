//! Form Engine - replay form events from stdin
//!
//! Opens one of the registration forms and applies newline-delimited JSON
//! events to it. Accepted submissions are logged as JSON.
//!
//! `form-engine --save-config [form]` stores the chosen form as the default.

use anyhow::Result;
use form_engine::config::EngineConfig;
use form_engine::session::run_events;
use form_engine::state::LogSubmitHandler;
use std::io;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> Result<()> {
    let config = EngineConfig::load()?;
    let mut args = std::env::args().skip(1);
    let arg = args.next();

    if arg.as_deref() == Some("--save-config") {
        let kind = config.resolve_form(args.next().as_deref())?;
        let config = EngineConfig {
            default_form: Some(kind.name().to_string()),
            ..config
        };
        match config.save()? {
            Some(path) => tracing::info!(form = %kind, path = %path.display(), "config saved"),
            None => tracing::warn!("no config directory available"),
        }
        return Ok(());
    }
    let kind = config.resolve_form(arg.as_deref())?;

    let definition = kind.definition()?;
    let options = config.apply(definition.options);
    let mut store = definition.with_options(options).into_store()?;
    tracing::info!(form = %kind, form_id = %store.id(), "form opened");

    let mut handler = LogSubmitHandler::new(kind.name());
    let summary = run_events(BufReader::new(tokio::io::stdin()), &mut store, &mut handler).await?;

    tracing::info!(
        events = summary.events,
        skipped = summary.skipped,
        submitted = summary.submitted,
        rejected = summary.rejected,
        "session finished"
    );
    Ok(())
}
