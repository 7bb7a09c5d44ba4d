use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticket_tagger::{
    classifier::TicketClassifier,
    config::{self, Cli},
    pipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine; the key may already be exported
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ticket_tagger=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.validate()?;

    let api_key = config::api_key()?;
    let classifier = TicketClassifier::new(&cli.api_base, &api_key, &cli.model);
    info!("Using model {} at {}", cli.model, cli.api_base);

    let settings = cli.settings();
    let outcome = pipeline::run(&classifier, &settings)
        .await
        .context("evaluation run failed")?;

    info!(
        "Done: zero-shot top-1 {:.2}% / top-3 {:.2}%, few-shot top-1 {:.2}% / top-3 {:.2}%",
        outcome.zero_shot.top1,
        outcome.zero_shot.top3,
        outcome.few_shot.top1,
        outcome.few_shot.top3
    );
    println!(
        "\nResults saved to {} and {}",
        settings.zero_shot_output.display(),
        settings.few_shot_output.display()
    );
    Ok(())
}
