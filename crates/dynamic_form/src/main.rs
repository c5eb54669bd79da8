use app::{AppBuilder, Application};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use dynamic_form::{cli::Cli, config::Config};

struct DynamicForm;

impl Application for DynamicForm {
    const APP_ID: &'static str = "dynamic_form";
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::parse().command();
    dynamic_form::errors::init()?;

    // stderr logging would tear the alternate screen
    let context = AppBuilder::<DynamicForm>::new(env!("CARGO_PKG_VERSION"))
        .console_logging(!cmd.is_interactive())
        .build()
        .map_err(|e| eyre!(e))?;
    let config = Config::new(context.path_context())?;

    dynamic_form::run(cmd, config).await
}
