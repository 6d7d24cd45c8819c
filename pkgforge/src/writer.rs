//! Artifact write modes
//!
//! Migrations are written with [`WriteMode::Append`]: their names carry a
//! timestamp, and a second run within the same second legitimately adds a
//! statement to the same file. Fixed-name sources use
//! [`WriteMode::CreateNew`] unless [`FixedFilePolicy::Append`] is chosen, in
//! which case an existing file receives a second rendering after the first
//! one and stops being valid source.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::error::GenerateError;

/// How a destination file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create the file, or append to it if it exists
    Append,
    /// Create the file; fail if it exists
    CreateNew,
}

/// Policy for fixed-name source artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedFilePolicy {
    /// Refuse to touch an existing file
    #[default]
    Create,
    /// Append to an existing file (legacy behaviour, produces invalid source)
    Append,
}

impl FixedFilePolicy {
    /// Write mode for an artifact kind under this policy
    #[must_use]
    pub const fn mode_for(self, kind: ArtifactKind) -> WriteMode {
        match (kind, self) {
            (ArtifactKind::Sql, _) | (_, Self::Append) => WriteMode::Append,
            (_, Self::Create) => WriteMode::CreateNew,
        }
    }
}

/// Create `dir` and its parents if missing
///
/// # Errors
///
/// Returns [`GenerateError::CreateDir`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(dir).map_err(|source| GenerateError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `content` to `path` using `mode`
///
/// # Errors
///
/// Returns [`GenerateError::AlreadyExists`] when `mode` is
/// [`WriteMode::CreateNew`] and the file exists, or
/// [`GenerateError::Write`] for any other I/O failure.
pub fn write_artifact(path: &Path, content: &str, mode: WriteMode) -> Result<(), GenerateError> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Append => options.create(true).append(true),
        WriteMode::CreateNew => options.write(true).create_new(true),
    };

    let mut file = options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            GenerateError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            GenerateError::Write {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        })
}
