pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod schema;
pub mod tui;

use color_eyre::{eyre::bail, Result};
use tracing::{info, warn};

use crate::{
    app::App,
    cli::Cmd,
    config::Config,
    engine::FormEngine,
    schema::SchemaRegistry,
};

/// Dispatch one parsed command. Logging and error hooks must already be set up.
pub async fn run(cmd: Cmd, config: Config) -> Result<()> {
    let registry = SchemaRegistry::builtin();
    match cmd {
        Cmd::Run { form_type } => {
            let mut engine = FormEngine::new(registry.clone());
            let initial = form_type.unwrap_or_else(|| config.ui.initial_form_type.clone());
            if !initial.is_empty() {
                if !registry.contains(&initial) {
                    warn!(form_type = %initial, "unknown initial form type");
                }
                engine.select_form_type(initial);
            }
            App::new(config, engine).run().await
        }
        Cmd::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(registry.as_ref())?);
            } else {
                print!("{}", headless::render_listing(&registry));
            }
            Ok(())
        }
        Cmd::Submit {
            form_type,
            set,
            json,
        } => {
            if !registry.contains(&form_type) {
                let known: Vec<&str> = registry.ids().collect();
                bail!("unknown form type `{form_type}`, expected one of: {}", known.join(", "));
            }
            let mut engine = FormEngine::new(registry);
            let report = headless::submit(&mut engine, &form_type, &set)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", headless::render_report(&report));
            }
            if !report.accepted {
                bail!("submission rejected with {} error(s)", report.errors.len());
            }
            info!(form_type = %form_type, "headless submission accepted");
            Ok(())
        }
    }
}
