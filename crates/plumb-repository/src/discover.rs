use std::path::{Path, PathBuf};

use tracing::trace;

use crate::env::EnvOverrides;
use crate::{DiscoveredRepo, RepoError, RepositoryKind, METADATA_DIR};

/// Discover a repository by walking up from `start`.
///
/// 1. Check `$PLUMB_DIR` and use it directly if set
/// 2. Walk up from `start`:
///    a. Check for a `.plumb/` directory
///    b. Check if the directory itself is a bare store
///    c. Go to parent, repeat
pub fn discover_store_dir(start: &Path) -> Result<DiscoveredRepo, RepoError> {
    discover_store_dir_with_env(start, &EnvOverrides::from_env())
}

/// Discover with explicit environment overrides (for testing).
pub fn discover_store_dir_with_env(
    start: &Path,
    env: &EnvOverrides,
) -> Result<DiscoveredRepo, RepoError> {
    if let Some(ref store_dir) = env.store_dir {
        let store_dir = if store_dir.is_absolute() {
            store_dir.clone()
        } else {
            start.join(store_dir)
        };
        return open_store_dir(&store_dir);
    }

    let start =
        std::fs::canonicalize(start).map_err(|_| RepoError::NotFound(start.to_path_buf()))?;

    let mut current = start.clone();
    loop {
        trace!(dir = %current.display(), "probing for repository");
        let metadata = metadata_dir_of(&current);

        if metadata.is_dir() {
            if !is_store_dir(&metadata) {
                return Err(RepoError::InvalidStoreDir {
                    path: metadata,
                    reason: "missing HEAD or refs/".to_string(),
                });
            }
            return Ok(DiscoveredRepo {
                store_dir: metadata,
                work_tree: Some(current),
                kind: RepositoryKind::Normal,
            });
        }

        if is_store_dir(&current) {
            return Ok(DiscoveredRepo {
                store_dir: current,
                work_tree: None,
                kind: RepositoryKind::Bare,
            });
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return Err(RepoError::NotFound(start)),
        }
    }
}

/// Open a known store directory directly.
///
/// A store directory named `.plumb` belongs to the work tree that contains
/// it; any other store directory is bare.
pub fn open_store_dir(store_dir: &Path) -> Result<DiscoveredRepo, RepoError> {
    let store_dir = std::fs::canonicalize(store_dir)
        .map_err(|_| RepoError::NotFound(store_dir.to_path_buf()))?;

    if !is_store_dir(&store_dir) {
        return Err(RepoError::InvalidStoreDir {
            path: store_dir,
            reason: "missing HEAD or refs/".to_string(),
        });
    }

    if let Some(parent) = store_dir.parent() {
        if parent.join(METADATA_DIR) == store_dir {
            return Ok(DiscoveredRepo {
                work_tree: Some(parent.to_path_buf()),
                store_dir,
                kind: RepositoryKind::Normal,
            });
        }
    }

    Ok(DiscoveredRepo {
        store_dir,
        work_tree: None,
        kind: RepositoryKind::Bare,
    })
}

/// Open the repository whose work tree root is `work_tree`.
pub fn open_from_work_tree(work_tree: &Path) -> Result<DiscoveredRepo, RepoError> {
    let metadata = metadata_dir_of(work_tree);
    if !metadata.is_dir() {
        return Err(RepoError::NotFound(work_tree.to_path_buf()));
    }
    open_store_dir(&metadata)
}

/// Check if a directory looks like a store directory (has HEAD and refs/).
///
/// `objects/` is deliberately not required here: a missing object
/// directory is reported by the object store itself.
pub fn is_store_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("refs").is_dir()
}

/// The directory a store lives in when it is not bare.
pub(crate) fn metadata_dir_of(work_tree: &Path) -> PathBuf {
    work_tree.join(METADATA_DIR)
}
