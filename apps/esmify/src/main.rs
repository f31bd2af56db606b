use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use esmify_core::{SourceCollectorConfig, collect_sources, transform};
use esmify_migrate::Config;
use log::{debug, info};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Parser)]
#[command(name = "esmify")]
#[command(about = "Rewrite legacy define/require modules to import/export syntax", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rewrite every source file under a root in place
    Migrate(Config),
    /// Print the rewritten text of a file, or of every source file in a directory
    Print {
        /// File or directory to transform
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Migrate(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running migration (using {} threads)", num_threads);
            debug!("Config: root={:?}, filter={:?}", cfg.root, cfg.filter);

            let json = cfg.json;
            let report = esmify_migrate::run_migration(cfg)?;
            let elapsed_ms = start.elapsed().as_millis();

            if json {
                esmify_migrate::print_json_report(&mut stdout, &report)?;
            } else {
                esmify_migrate::print_report(&mut stdout, &report)?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files (using {} threads).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    report.files.len().to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if report.has_failures() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Print { path } => {
            info!("Printing rewritten output for {}", path.display());
            print_sources(&mut stdout, &path)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Print each file name, its rewritten text and a separator. Never writes files.
fn print_sources<W: Write>(writer: &mut W, path: &Path) -> Result<()> {
    let files = if path.is_dir() {
        collect_sources(&SourceCollectorConfig { root: path.to_path_buf(), filter: None })?
    } else {
        vec![path.to_path_buf()]
    };
    debug!("Printing {} files", files.len());

    for file in files {
        let source = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let name = file.strip_prefix(path).ok().filter(|p| !p.as_os_str().is_empty());
        writeln!(writer, "{}", name.unwrap_or(&file).display().to_string().bold())?;

        match transform(&source) {
            Ok(result) => {
                if let Some(code) = &result.code {
                    write!(writer, "{}", code)?;
                } else {
                    writeln!(writer, "{}", "(no changes)".dimmed())?;
                }
                if result.has_inner_requires {
                    writeln!(writer, "{}", "(require inside a function, not written)".yellow())?;
                }
            }
            Err(e) => writeln!(writer, "{}", e.to_string().red())?,
        }
        writeln!(writer, "---------")?;
    }
    Ok(())
}
