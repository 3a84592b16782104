//! Global context for CLI commands

use crate::cli::ViewArgs;
use anyhow::{Context as _, Result};
use redline_core::DiffConfig;
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory
const CONFIG_FILE: &str = "redline.toml";

/// Diff settings and output options for one invocation
pub struct Context {
    pub config: DiffConfig,
    pub show_redlines: bool,
    pub verbose: bool,
}

impl Context {
    /// Resolve settings: `--config`, else `./redline.toml`, else defaults
    ///
    /// `--engine` overrides the engine from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is invalid
    pub fn new(view: &ViewArgs, verbose: bool) -> Result<Self> {
        let mut config = match config_path(view.config.as_deref())? {
            Some(path) => {
                log::debug!("loading config from {}", path.display());
                DiffConfig::from_file(&path)?
            }
            None => DiffConfig::default(),
        };

        if let Some(engine) = view.engine {
            config.engine = engine.into();
        }

        Ok(Self {
            config,
            show_redlines: !view.no_redlines,
            verbose,
        })
    }
}

fn config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    let local = std::env::current_dir()
        .context("Failed to read current directory")?
        .join(CONFIG_FILE);
    Ok(local.is_file().then_some(local))
}

/// Read a document, naming the file on failure
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
