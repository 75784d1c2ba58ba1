//! Repository bootstrap, discovery, and the explicit repository handle.
//!
//! A repository is a store directory holding `HEAD`, `objects/` and
//! `refs/heads/`. Normally it is the `.plumb` directory at the root of a work
//! tree; a bare repository has no work tree and the store directory is the
//! repository itself.

mod discover;
mod env;
mod error;
mod init;

pub use discover::{is_store_dir, open_store_dir};
pub use env::{EnvOverrides, Identity, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME};
pub use error::RepoError;
pub use init::init_repository;

use std::fs;
use std::path::{Path, PathBuf};

use plumb_store::ObjectStore;
use tracing::debug;

/// Name of the metadata directory at the root of a work tree.
pub const METADATA_DIR: &str = ".plumb";

/// Branch `HEAD` points at after `init` unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "main";

/// Type of repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    /// Store directory inside a work tree.
    Normal,
    /// Store directory with no work tree.
    Bare,
}

/// Result of repository discovery before full opening.
#[derive(Debug, Clone)]
pub struct DiscoveredRepo {
    pub store_dir: PathBuf,
    pub work_tree: Option<PathBuf>,
    pub kind: RepositoryKind,
}

/// Options for repository initialization.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub bare: bool,
    /// Defaults to [`DEFAULT_BRANCH`].
    pub default_branch: Option<String>,
}

/// An opened repository: where it lives plus a handle to its object store.
///
/// Every operation goes through an explicit handle; nothing depends on the
/// process working directory once the repository has been opened.
#[derive(Debug, Clone)]
pub struct Repository {
    store_dir: PathBuf,
    work_tree: Option<PathBuf>,
    kind: RepositoryKind,
    store: ObjectStore,
}

impl Repository {
    /// Open an existing repository.
    ///
    /// `path` may be the store directory itself or a work tree root
    /// containing `.plumb`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let discovered = if is_store_dir(path) {
            discover::open_store_dir(path)?
        } else if path.join(METADATA_DIR).exists() {
            discover::open_from_work_tree(path)?
        } else {
            return Err(RepoError::NotFound(path.to_path_buf()));
        };
        Self::from_discovered(discovered)
    }

    /// Discover a repository starting from the given directory, walking up.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let discovered = discover::discover_store_dir(start.as_ref())?;
        Self::from_discovered(discovered)
    }

    /// Discover with explicit environment overrides.
    pub fn discover_with_env(
        start: impl AsRef<Path>,
        env: &EnvOverrides,
    ) -> Result<Self, RepoError> {
        let discovered = discover::discover_store_dir_with_env(start.as_ref(), env)?;
        Self::from_discovered(discovered)
    }

    /// Initialize a new repository at the given path.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::init_opts(path, &InitOptions::default())
    }

    /// Initialize a new repository with custom options.
    pub fn init_opts(path: impl AsRef<Path>, opts: &InitOptions) -> Result<Self, RepoError> {
        let discovered = init::init_repository(path.as_ref(), opts)?;
        Self::from_discovered(discovered)
    }

    fn from_discovered(discovered: DiscoveredRepo) -> Result<Self, RepoError> {
        let DiscoveredRepo {
            store_dir,
            work_tree,
            kind,
        } = discovered;

        let store = ObjectStore::open(store_dir.join("objects"))?;
        debug!(store_dir = %store_dir.display(), ?kind, "opened repository");

        Ok(Self {
            store_dir,
            work_tree,
            kind,
            store,
        })
    }

    /// Path to the store directory (`.plumb` or the bare repository root).
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Path to the work tree root.
    pub fn work_tree(&self) -> Result<&Path, RepoError> {
        self.work_tree.as_deref().ok_or(RepoError::BareNoWorkTree)
    }

    pub fn kind(&self) -> RepositoryKind {
        self.kind
    }

    pub fn is_bare(&self) -> bool {
        self.kind == RepositoryKind::Bare
    }

    /// Access the object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Access the object store mutably (e.g. to change the compression level).
    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    /// The ref `HEAD` points at, e.g. `refs/heads/main`.
    pub fn head(&self) -> Result<String, RepoError> {
        let path = self.store_dir.join("HEAD");
        let content = fs::read_to_string(&path)
            .map_err(|e| RepoError::InvalidHead(format!("{}: {e}", path.display())))?;
        let target = content
            .strip_suffix('\n')
            .unwrap_or(&content)
            .strip_prefix("ref: ")
            .ok_or_else(|| RepoError::InvalidHead(format!("not a symbolic ref: {content:?}")))?;
        if !target.starts_with("refs/") || target.contains(char::is_whitespace) {
            return Err(RepoError::InvalidHead(format!("bad ref name: {target:?}")));
        }
        Ok(target.to_string())
    }

    /// The branch `HEAD` points at, without the `refs/heads/` prefix.
    pub fn current_branch(&self) -> Result<String, RepoError> {
        let head = self.head()?;
        Ok(head
            .strip_prefix("refs/heads/")
            .unwrap_or(&head)
            .to_string())
    }
}
