use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "migrate")]
#[command(about = "Rewrite legacy define/require modules to import/export syntax")]
pub struct Config {
    /// Root directory to scan (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Only process files whose path relative to the root contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Initialize the config by resolving the root directory
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, searching for git root");
            esmify_core::find_git_root()?
        };
        info!("Using root directory: {}", root.display());

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
