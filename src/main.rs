use clap::Parser;

use cliphaven::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cliphaven::bootstrap::run::run(cli).await
}
