use clap::Parser;
use tracing_subscriber::EnvFilter;

mod assignment;
mod cli;
mod core;
mod demux;
mod reads;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("haplosplit=debug,info")
    } else {
        EnvFilter::new("haplosplit=info")
    };

    // Summaries go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Split(args) => {
            cli::split::run(args, cli.format)?;
        }
        cli::Commands::Blocks(args) => {
            cli::blocks::run(args, cli.format)?;
        }
    }

    Ok(())
}
