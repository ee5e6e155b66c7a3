use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use repo_notifier::github::actions;
use repo_notifier::{
    Config, Dispatcher, EventDescriptor, Orchestrator, Outcome, UnsupportedEvent, WebhookNotifier,
};

#[derive(Parser)]
#[command(name = "repo-notifier")]
#[command(about = "Post a chat card for new issues, discussions and pull requests")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = ".github/repo-notifier.yml")]
    config: PathBuf,

    /// Webhook that receives the card
    #[arg(long, env = "INPUT_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Pull request filter ("onlyExternal" to skip pull requests from the repository itself)
    #[arg(long, env = "INPUT_PRCONDITION")]
    pr_condition: Option<String>,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Print the card instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level, including the sent payload
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "repo_notifier=debug"
    } else {
        "repo_notifier=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let config = Config::load(&cli.config)?.with_overrides(cli.webhook_url, cli.pr_condition);
    let time_zone = config.time_zone()?;

    let dispatcher = if cli.dry_run {
        Dispatcher::DryRun
    } else {
        Dispatcher::Webhook(WebhookNotifier::new(config.webhook_url()?, config.timeout())?)
    };

    let event = EventDescriptor::load(&cli.event_name, &cli.event_path)?;
    let orchestrator = Orchestrator::new(config.pr_condition, time_zone, dispatcher);

    match orchestrator.handle(&event).await {
        Ok(Outcome::Skipped) | Ok(Outcome::Printed(_)) => {}
        Ok(Outcome::Delivered(message)) => {
            info!(summary = %message.summary, "Done");
        }
        Ok(Outcome::DeliveryFailed(message)) => {
            warn!(summary = %message.summary, "Finished without delivering the notification");
        }
        Err(err) => {
            if let Some(unsupported) = err.downcast_ref::<UnsupportedEvent>() {
                actions::set_failed(&unsupported.to_string());
            }
            return Err(err);
        }
    }

    Ok(())
}
