use anyhow::Context;
use clap::Parser;
use spark::cli::{Cli, Command};
use spark::config::Settings;
use spark::forms::FormValues;
use spark::runner::{RunReport, Runner};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spark=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    match &cli.command {
        Command::Check => {
            // Settings::new_with_cli already rejected invalid definitions
            info!(
                wizards = settings.all_wizards().len(),
                api = %settings.api.base_url,
                "Configuration OK"
            );
            println!("OK: {} wizard(s)", settings.all_wizards().len());
        }
        Command::List => {
            for wizard in settings.all_wizards() {
                println!(
                    "{:<24} {:<32} {} step(s)  {}",
                    wizard.name,
                    wizard.title,
                    wizard.steps.len(),
                    wizard.request_url(&settings.api.base_url).unwrap_or_default()
                );
            }
        }
        Command::Run { wizard, values } => {
            let definition = settings
                .wizard(wizard)
                .with_context(|| format!("Unknown wizard '{}'", wizard))?;
            let content = std::fs::read_to_string(values)
                .with_context(|| format!("Failed to read {}", values.display()))?;
            let values = FormValues::from_value(serde_json::from_str(&content)?)
                .context("Values file must contain a JSON object")?;

            let report = Runner::new(&settings.forms, &settings.api)
                .run(&definition, &values)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !matches!(report, RunReport::Submitted { .. }) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
