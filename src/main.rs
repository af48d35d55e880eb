use clap::Parser;
use sitesearch::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sitesearch::tracing::init();
    let cli = Cli::parse();
    run(cli).await
}
