//! Finding training files on disk.

use std::fs;
use std::path::Path;

use tessel_core::{ArraySource, RawArray, SourceError};

use crate::dir::{contains_npy, NpyDir};
use crate::npz::{self, NpzFile};

/// A training file found by [`discover`].
#[derive(Clone, Debug)]
pub enum TrainingFile {
    /// An `.npz` archive.
    Npz(NpzFile),
    /// A directory of `.npy` files.
    Dir(NpyDir),
}

impl ArraySource for TrainingFile {
    fn name(&self) -> &str {
        match self {
            Self::Npz(f) => f.name(),
            Self::Dir(d) => d.name(),
        }
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        match self {
            Self::Npz(f) => f.array(key),
            Self::Dir(d) => d.array(key),
        }
    }
}

/// Every training file directly inside `parent`, sorted by path.
///
/// A training file is either a `*.npz` archive or a subdirectory
/// holding at least one `.npy` file. Anything else is skipped.
pub fn discover(parent: impl AsRef<Path>) -> Result<Vec<TrainingFile>, SourceError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(parent)? {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() && path.extension().is_some_and(|ext| ext == npz::EXTENSION) {
            files.push(TrainingFile::Npz(NpzFile::at(path)));
        } else if path.is_dir() && contains_npy(&path)? {
            files.push(TrainingFile::Dir(NpyDir::at(path)));
        }
    }
    Ok(files)
}
