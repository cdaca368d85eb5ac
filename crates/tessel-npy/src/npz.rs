//! A training file stored as a NumPy `.npz` archive.
//!
//! An `.npz` is a zip archive holding one `<key>.npy` entry per array,
//! as written by `numpy.savez` and `numpy.savez_compressed`.

use std::io;
use std::path::{Path, PathBuf};

use npyz::npz::{NpzArchive, NpzWriter};
use npyz::WriterBuilder;
use tessel_core::{ArrayData, ArraySource, RawArray, SourceError};

use crate::npy::{finish, from_npy, shape_u64, write_data};

/// Extension of archive files.
pub const EXTENSION: &str = "npz";

/// An `.npz` archive exposed as an [`ArraySource`].
///
/// The archive is opened on each [`array`](ArraySource::array) call, so
/// holding an `NpzFile` keeps no file handle open.
#[derive(Clone, Debug)]
pub struct NpzFile {
    path: PathBuf,
    name: String,
}

impl NpzFile {
    /// Refer to an existing archive.
    ///
    /// # Errors
    ///
    /// [`SourceError::Io`] with [`io::ErrorKind::NotFound`] if `path` is
    /// not a file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SourceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            )));
        }
        Ok(Self::at(path))
    }

    pub(crate) fn at(path: PathBuf) -> Self {
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Write every array of `source` listed in `keys` to a new archive
    /// at `path`, replacing any existing file.
    pub fn create<'k, S: ArraySource + ?Sized>(
        path: impl Into<PathBuf>,
        source: &S,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Self, SourceError> {
        let path = path.into();
        let mut npz = NpzWriter::create(&path)?;
        for key in keys {
            let array = source.array(key)?;
            let shape = shape_u64(&array);
            write_data!(npz.array(key, Default::default())?, &shape, array.data())?;
        }
        drop(npz);
        Ok(Self::at(path))
    }

    /// The archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the arrays in the archive, in archive order.
    pub fn keys(&self) -> Result<Vec<String>, SourceError> {
        let archive = NpzArchive::open(&self.path)?;
        Ok(archive.array_names().map(str::to_string).collect())
    }
}

impl ArraySource for NpzFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        let mut archive = NpzArchive::open(&self.path)?;
        let npy = archive
            .by_name(key)?
            .ok_or_else(|| SourceError::MissingArray {
                name: key.to_string(),
            })?;
        from_npy(npy)
    }
}
