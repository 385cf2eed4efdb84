mod args;
mod check;
mod output;
mod serve;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = <Cli as clap::Parser>::parse();
    match cli.cmd {
        Commands::Check(args) => {
            let summary = check::run_check(args).await?;
            eprintln!("{summary}");
            // codes de sortie : 0 tout valide, 2 au moins un non valide, 1 fatal
            if !summary.all_valid() {
                std::process::exit(2);
            }
        }
        Commands::Worker(args) => serve::serve_worker(args).await?,
        Commands::Front(args) => serve::serve_front(args).await?,
        Commands::TestProxy(args) => serve::run_test_proxy(args).await?,
    }
    Ok(())
}
