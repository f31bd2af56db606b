use serde::Serialize;
use std::path::PathBuf;

/// Outcome of migrating one file. Exactly one per collected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Rewritten, and written back unless this was a dry run
    Rewritten,
    Unchanged,
    /// Rewritable, but resolver calls inside functions keep it as is
    Withheld,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub rewritten: usize,
    pub unchanged: usize,
    pub withheld: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub root: PathBuf,
    pub dry_run: bool,
    /// Sorted by path
    pub files: Vec<FileReport>,
}

impl MigrationReport {
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for file in &self.files {
            match file.status {
                FileStatus::Rewritten => counts.rewritten += 1,
                FileStatus::Unchanged => counts.unchanged += 1,
                FileStatus::Withheld => counts.withheld += 1,
                FileStatus::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| matches!(f.status, FileStatus::Failed { .. }))
    }
}
