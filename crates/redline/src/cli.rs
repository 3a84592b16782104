//! CLI command structure using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use redline_core::Engine;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two markdown documents
    Diff {
        /// Earlier version
        from: PathBuf,

        /// Later version
        to: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Compare two drafts of a version-set JSON file
    Versions {
        /// JSON file with v1_draft .. v4_final
        file: PathBuf,

        /// Version to compare from (1-4)
        #[arg(long, default_value_t = 1)]
        from: usize,

        /// Version to compare to (1-4)
        #[arg(long, default_value_t = 2)]
        to: usize,

        /// List captured versions instead of comparing
        #[arg(long)]
        list: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Options shared by every comparison
#[derive(Args)]
pub struct ViewArgs {
    /// Diff engine to start the fallback chain at
    #[arg(long, value_enum)]
    pub engine: Option<EngineArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Diff settings (TOML)
    #[arg(long, env = "REDLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show the later version without redlines
    #[arg(long)]
    pub no_redlines: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EngineArg {
    Structural,
    LineAware,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Structural => Engine::Structural,
            EngineArg::LineAware => Engine::LineAware,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Html,
    Json,
}
