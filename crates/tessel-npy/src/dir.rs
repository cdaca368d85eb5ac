//! A training file stored as a directory of `.npy` arrays.
//!
//! Each named array lives in `<dir>/<key>.npy`. Arrays are read lazily,
//! when the pipeline asks for them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tessel_core::{ArraySource, RawArray, SourceError};

use crate::npy::{read_npy_file, write_npy_file};

/// Extension of array files inside an [`NpyDir`].
pub const EXTENSION: &str = "npy";

/// A directory of `<key>.npy` files exposed as an [`ArraySource`].
#[derive(Clone, Debug)]
pub struct NpyDir {
    root: PathBuf,
    name: String,
}

impl NpyDir {
    /// Open an existing directory.
    ///
    /// # Errors
    ///
    /// [`SourceError::Io`] with [`io::ErrorKind::NotFound`] if `root` is
    /// not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SourceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )));
        }
        Ok(Self::at(root))
    }

    /// Create the directory (and parents) if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self::at(root))
    }

    pub(crate) fn at(root: PathBuf) -> Self {
        let name = root.display().to_string();
        Self { root, name }
    }

    /// The directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    /// Store `array` under `key`, replacing any existing file.
    pub fn write_array(&self, key: &str, array: &RawArray) -> Result<(), SourceError> {
        write_npy_file(self.path_for(key), array)
    }

    /// Store every array of `source` listed in `keys`.
    pub fn write_all<'k, S: ArraySource + ?Sized>(
        &self,
        source: &S,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<(), SourceError> {
        for key in keys {
            self.write_array(key, &source.array(key)?)?;
        }
        Ok(())
    }
}

pub(crate) fn contains_npy(dir: &Path) -> Result<bool, SourceError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == EXTENSION) {
            return Ok(true);
        }
    }
    Ok(false)
}

impl ArraySource for NpyDir {
    fn name(&self) -> &str {
        &self.name
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(SourceError::MissingArray {
                name: key.to_string(),
            });
        }
        read_npy_file(path)
    }
}
