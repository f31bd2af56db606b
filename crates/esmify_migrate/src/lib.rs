//! Batch migration of legacy JavaScript modules to import/export syntax.
//!
//! Walks a project, rewrites each source file with [`esmify_core::transform_with`]
//! and writes it back only when that is safe: the file changed, it has no
//! `require` calls inside functions, and the rewritten text still parses.
//! Every file ends up with exactly one [`FileStatus`].
//!
//! # Examples
//!
//! ```no_run
//! use esmify_migrate::{Config, print_report, run_migration};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     filter: Some("legacy/".to_string()),
//!     dry_run: true,
//!     json: false,
//! };
//!
//! let report = run_migration(cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_report(&mut stdout, &report)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod reporter;
mod runner;
mod types;

// Re-export public API
pub use config::Config;
pub use reporter::{print_json_report, print_report};
pub use runner::run_migration;
pub use types::{FileReport, FileStatus, MigrationReport, StatusCounts};
