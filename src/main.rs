use anyhow::Result;
use clap::Parser;
use lantoe::cli::{run_cli, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts on stdout.
    let default_level = match cli.options.verbose {
        0 => "warn",
        1 => "lantoe=info",
        _ => "lantoe=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run_cli(cli).await
}
