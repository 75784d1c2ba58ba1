use std::path::PathBuf;

use plumb_utils::date::{GitDate, Signature};

use crate::RepoError;

/// Fallback author name when nothing is configured.
pub const DEFAULT_AUTHOR_NAME: &str = "Unknown";
/// Fallback author email when nothing is configured.
pub const DEFAULT_AUTHOR_EMAIL: &str = "unknown@unknown";

/// Environment variable overrides for repository operations.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    /// PLUMB_DIR override
    pub store_dir: Option<PathBuf>,
    /// PLUMB_AUTHOR_NAME, then GIT_AUTHOR_NAME
    pub author_name: Option<String>,
    /// PLUMB_AUTHOR_EMAIL, then GIT_AUTHOR_EMAIL
    pub author_email: Option<String>,
    /// PLUMB_AUTHOR_DATE, raw `"<unix-seconds> <+hhmm>"`
    pub author_date: Option<String>,
}

impl EnvOverrides {
    /// Read all recognized environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            store_dir: get("PLUMB_DIR").map(PathBuf::from),
            author_name: get("PLUMB_AUTHOR_NAME").or_else(|| get("GIT_AUTHOR_NAME")),
            author_email: get("PLUMB_AUTHOR_EMAIL").or_else(|| get("GIT_AUTHOR_EMAIL")),
            author_date: get("PLUMB_AUTHOR_DATE"),
        }
    }

    /// The identity commits are attributed to.
    pub fn identity(&self) -> Identity {
        Identity {
            name: self
                .author_name
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            email: self
                .author_email
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string()),
        }
    }

    /// The commit timestamp: pinned by `author_date`, else the current time
    /// in the local timezone.
    pub fn author_date(&self) -> Result<GitDate, RepoError> {
        match &self.author_date {
            Some(raw) => Ok(GitDate::parse_raw(raw)?),
            None => Ok(GitDate::now()),
        }
    }

    /// Identity plus timestamp, ready to put in a commit.
    pub fn author_signature(&self) -> Result<Signature, RepoError> {
        let identity = self.identity();
        Ok(Signature::new(
            &identity.name,
            &identity.email,
            self.author_date()?,
        )?)
    }
}

/// Who a commit is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}
