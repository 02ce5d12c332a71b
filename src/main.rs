use anyhow::Result;
use chatter::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
