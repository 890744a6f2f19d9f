use clap::Parser;
use miette::Result;
use peerplan::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => peerplan::cli::commands::plan::run(args),
        Commands::Edges(args) => peerplan::cli::commands::edges::run(args),
        Commands::Validate(args) => peerplan::cli::commands::validate::run(args),
    }
}
