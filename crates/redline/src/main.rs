mod cli;
mod commands;
mod context;
mod output;
mod terminal;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Commands::Diff { from, to, view } => commands::diff::run(from, to, view, cli.verbose),
        Commands::Versions {
            file,
            from,
            to,
            list,
            view,
        } => commands::versions::run(file, *from, *to, *list, view, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
