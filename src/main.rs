use clap::Parser;
use hearttalk::app::Application;
use hearttalk::chat::ChatCoordinator;
use hearttalk::cli::Args;
use hearttalk::commands::create_command_registry;
use hearttalk::config::Config;
use hearttalk::service::ServiceStatus;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "hearttalk=debug"
    } else {
        "hearttalk=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env(|name| std::env::var(name).ok());
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }

    // Debug builds refuse to start without a key; release builds run with
    // replies disabled.
    if cfg!(debug_assertions) {
        config.require_api_key()?;
    }

    let service = ServiceStatus::from_config(&config);
    let chat = ChatCoordinator::new(service).with_timeout(config.timeout());
    let command_dispatcher = create_command_registry();

    let mut app = Application::new(args, chat, command_dispatcher);
    app.run().await?;

    Ok(())
}
