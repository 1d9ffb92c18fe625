use anyhow::Result;
use clap::Parser;
use quill_main::{Cli, init_tracing, run};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = run(cli).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
