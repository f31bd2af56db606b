use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::JS_EXTENSIONS;

pub struct SourceCollectorConfig {
    pub root: PathBuf,
    /// Keep only files whose root-relative path contains this substring
    pub filter: Option<String>,
}

/// Every JavaScript source under the root, gitignore honoured, sorted by path.
pub fn collect_sources(cfg: &SourceCollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting source files");
    let mut files: Vec<PathBuf> = Vec::new();
    let root = &cfg.root;
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root).hidden(false).ignore(true).git_ignore(true).build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() || !has_js_extension(p) {
            continue;
        }

        if let Some(filter) = &cfg.filter {
            let rel_str = p.strip_prefix(root).unwrap_or(p).to_string_lossy();
            if !rel_str.contains(filter.as_str()) {
                trace!("Filtered out '{}' (no match for '{}')", rel_str, filter);
                continue;
            }
        }

        trace!("Found source file: {}", p.display());
        files.push(p.to_path_buf());
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}

fn has_js_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str) {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, "// source").expect("Failed to write test file");
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collects_js_extensions_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for path in ["src/b.js", "src/a.jsx", "lib/c.mjs", "lib/d.cjs", "src/e.ts", "README.md"] {
            create_test_file(root, path);
        }

        let files =
            collect_sources(&SourceCollectorConfig { root: root.to_path_buf(), filter: None })
                .unwrap();

        assert_eq!(relative(root, &files), vec!["lib/c.mjs", "lib/d.cjs", "src/a.jsx", "src/b.js"]);
    }

    #[test]
    fn test_filter_matches_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for path in ["app/widgets/list.js", "app/models/user.js", "vendor/widgets.js"] {
            create_test_file(root, path);
        }

        let files = collect_sources(&SourceCollectorConfig {
            root: root.to_path_buf(),
            filter: Some("widgets".to_string()),
        })
        .unwrap();

        assert_eq!(relative(root, &files), vec!["app/widgets/list.js", "vendor/widgets.js"]);
    }

    #[test]
    fn test_gitignored_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".gitignore"), "dist/\n").unwrap();
        create_test_file(root, "src/main.js");
        create_test_file(root, "dist/bundle.js");

        let files =
            collect_sources(&SourceCollectorConfig { root: root.to_path_buf(), filter: None })
                .unwrap();

        assert_eq!(relative(root, &files), vec!["src/main.js"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_sources(&SourceCollectorConfig {
            root: temp_dir.path().to_path_buf(),
            filter: None,
        })
        .unwrap();
        assert!(files.is_empty());
    }
}
