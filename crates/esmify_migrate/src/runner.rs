use anyhow::{Context, Result};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{fs, path::Path, thread};

use esmify_core::{
    SourceCollectorConfig, collect_sources, default_source_type, transform_with, verify_output,
};

use crate::{
    config::Config,
    types::{FileReport, FileStatus, MigrationReport},
};

pub fn run_migration(mut cfg: Config) -> Result<MigrationReport> {
    info!("Starting migration");

    cfg.initialize()?;
    let root = cfg.root()?.clone();

    debug!("Collecting source files with filter: {:?}", cfg.filter);
    let collector_cfg = SourceCollectorConfig { root: root.clone(), filter: cfg.filter.clone() };
    let sources = collect_sources(&collector_cfg)?;
    if sources.is_empty() {
        warn!("No source files found under {}", root.display());
    }
    info!("Processing {} source files in parallel", sources.len());

    // Files never share state, so one failing cannot affect another
    let files: Vec<FileReport> = sources
        .par_iter()
        .map(|path| {
            debug!("Thread {:?} processing: {}", thread::current().id(), path.display());
            let status = match migrate_file(path, cfg.dry_run) {
                Ok(status) => status,
                Err(e) => {
                    warn!("Failed to migrate {}: {:#}", path.display(), e);
                    FileStatus::Failed { reason: format!("{:#}", e) }
                }
            };
            trace!("{} -> {:?}", path.display(), status);
            FileReport { path: path.clone(), status }
        })
        .collect();

    let report = MigrationReport { root, dry_run: cfg.dry_run, files };
    let counts = report.counts();
    info!(
        "Migration complete: {} rewritten, {} unchanged, {} withheld, {} failed",
        counts.rewritten, counts.unchanged, counts.withheld, counts.failed
    );
    Ok(report)
}

fn migrate_file(path: &Path, dry_run: bool) -> Result<FileStatus> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let source_type = default_source_type();
    let result = transform_with(&source, source_type)?;

    if !result.should_write() {
        if result.is_changed {
            debug!("Withholding {}: resolver calls inside functions", path.display());
            return Ok(FileStatus::Withheld);
        }
        return Ok(FileStatus::Unchanged);
    }

    let Some(code) = result.code else {
        return Ok(FileStatus::Unchanged);
    };
    verify_output(&code, source_type)?;

    if dry_run {
        debug!("Dry run, not writing {}", path.display());
    } else {
        fs::write(path, code).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }
    Ok(FileStatus::Rewritten)
}
