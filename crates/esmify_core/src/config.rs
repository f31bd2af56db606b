use anyhow::{Result, anyhow};
use log::{debug, trace};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Nearest ancestor of the current directory holding a `.git` entry.
pub fn find_git_root() -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    find_git_root_from(&cwd)
}

/// Nearest ancestor of `start` (itself included) holding a `.git` entry.
pub fn find_git_root_from(start: &Path) -> Result<PathBuf> {
    debug!("Searching for git root from: {}", start.display());

    for dir in start.ancestors() {
        trace!("Checking for .git in: {}", dir.display());
        if dir.join(".git").exists() {
            debug!("Found git root at: {}", dir.display());
            return Ok(dir.to_path_buf());
        }
    }

    debug!("No .git directory above {}", start.display());
    Err(anyhow!("Could not find .git directory above {}", start.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_root_from_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("src").join("legacy").join("widgets");
        fs::create_dir_all(&nested).unwrap();

        let git_root = find_git_root_from(&nested).unwrap();
        assert_eq!(git_root, root);
    }

    #[test]
    fn test_start_directory_itself_can_be_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();

        assert_eq!(find_git_root_from(root).unwrap(), root);
    }

    #[test]
    fn test_git_file_marks_a_worktree_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".git"), "gitdir: ../main/.git/worktrees/feature\n").unwrap();
        let nested = root.join("lib");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root_from(&nested).unwrap(), root);
    }

    #[test]
    fn test_innermost_repository_wins() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path();
        let inner = outer.join("vendor").join("module");
        fs::create_dir_all(outer.join(".git")).unwrap();
        fs::create_dir_all(inner.join(".git")).unwrap();
        fs::create_dir_all(inner.join("src")).unwrap();

        assert_eq!(find_git_root_from(&inner.join("src")).unwrap(), inner);
    }
}
