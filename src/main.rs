mod entrypoints;

use clap::Parser;
use entrypoints::cli::Settings;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    entrypoints::logging::setup_logging();
    entrypoints::run::run(settings).await
}
