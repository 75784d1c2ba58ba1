use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::discover::metadata_dir_of;
use crate::{DiscoveredRepo, InitOptions, RepoError, RepositoryKind, DEFAULT_BRANCH};

/// Initialize a new repository.
///
/// Creates the store layout:
/// - HEAD (pointing to the default branch)
/// - objects/
/// - refs/heads/
///
/// For a normal repository these live under `<path>/.plumb`; a bare
/// repository puts them directly at `path`.
pub fn init_repository(path: &Path, options: &InitOptions) -> Result<DiscoveredRepo, RepoError> {
    let path = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };

    let (store_dir, work_tree, kind) = if options.bare {
        (path.clone(), None, RepositoryKind::Bare)
    } else {
        (metadata_dir_of(&path), Some(path.clone()), RepositoryKind::Normal)
    };

    // Re-running init never overwrites an existing HEAD.
    if store_dir.join("HEAD").is_file() {
        debug!(store_dir = %store_dir.display(), "reinitializing existing repository");
        fs::create_dir_all(store_dir.join("objects"))?;
        fs::create_dir_all(store_dir.join("refs").join("heads"))?;
        return Ok(DiscoveredRepo {
            store_dir,
            work_tree,
            kind,
        });
    }

    let branch = options.default_branch.as_deref().unwrap_or(DEFAULT_BRANCH);
    if branch.is_empty() || branch.contains(['\n', ' ']) || branch.contains("..") {
        return Err(RepoError::InvalidHead(format!(
            "invalid default branch name '{branch}'"
        )));
    }

    fs::create_dir_all(store_dir.join("objects"))?;
    fs::create_dir_all(store_dir.join("refs").join("heads"))?;
    fs::write(store_dir.join("HEAD"), format!("ref: refs/heads/{branch}\n"))?;

    info!(store_dir = %store_dir.display(), branch, "initialized repository");
    Ok(DiscoveredRepo {
        store_dir,
        work_tree,
        kind,
    })
}
