use std::{
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::{ColoredString, Colorize};
use log::{debug, trace};

use crate::types::{FileStatus, MigrationReport};

/// Relativize a path to the current working directory for clickable links
fn relativize_to_cwd(path: &Path) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return path.display().to_string();
        }
    };

    match make_relative(path, &cwd) {
        Some(rel_path) => {
            let result = rel_path.to_string_lossy().to_string();
            trace!("Relativized '{}' to '{}'", path.display(), result);
            result
        }
        None => path.display().to_string(),
    }
}

/// Create a relative path from `base` to `target`. `None` when they share no root.
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    if target.first() != base.first() {
        return None;
    }

    let common = target.iter().zip(&base).take_while(|(t, b)| t == b).count();
    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &target[common..] {
        result.push(component);
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

fn status_tag(status: &FileStatus) -> ColoredString {
    match status {
        FileStatus::Rewritten => "rewritten".green().bold(),
        FileStatus::Unchanged => "unchanged".dimmed(),
        FileStatus::Withheld => "withheld ".yellow().bold(),
        FileStatus::Failed { .. } => "failed   ".red().bold(),
    }
}

pub fn print_report<W: Write>(writer: &mut W, report: &MigrationReport) -> io::Result<()> {
    debug!("Printing report for {} files", report.files.len());

    for file in &report.files {
        let display_path = relativize_to_cwd(&file.path);
        match &file.status {
            FileStatus::Withheld => writeln!(
                writer,
                "{} {} {}",
                status_tag(&file.status),
                display_path,
                "(require inside a function)".dimmed()
            )?,
            FileStatus::Failed { reason } => writeln!(
                writer,
                "{} {}: {}",
                status_tag(&file.status),
                display_path.bright_white().bold(),
                reason.red()
            )?,
            _ => writeln!(writer, "{} {}", status_tag(&file.status), display_path)?,
        }
    }

    print_summary(writer, report)?;
    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, report: &MigrationReport) -> io::Result<()> {
    let counts = report.counts();

    writeln!(writer, "\n{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    let verb = if report.dry_run { "Would rewrite" } else { "Rewritten" };
    writeln!(writer, "  {}: {}", verb, counts.rewritten.to_string().green().bold())?;
    writeln!(writer, "  Unchanged: {}", counts.unchanged)?;
    writeln!(writer, "  Withheld: {}", counts.withheld.to_string().yellow())?;
    writeln!(writer, "  Failed: {}", counts.failed.to_string().red().bold())?;
    if report.dry_run {
        writeln!(writer, "  {}", "Dry run, no files were written".dimmed())?;
    }
    Ok(())
}

pub fn print_json_report<W: Write>(writer: &mut W, report: &MigrationReport) -> io::Result<()> {
    debug!("Printing JSON report for {} files", report.files.len());
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
