use deckpulse::commands::Cli;
use deckpulse::libs::telemetry;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init();
    Cli::menu().await
}
