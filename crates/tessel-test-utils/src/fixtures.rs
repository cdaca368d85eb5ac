//! [`ArraySource`] wrappers for error-path and access testing.
//!
//! - [`FailingSource`] fails with an I/O error on one key.
//! - [`CountingSource`] counts reads through to an inner source.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessel_core::{ArraySource, RawArray, SourceError};

/// Delegates to `inner` except for `fail_on`, which always fails.
pub struct FailingSource<S> {
    pub inner: S,
    pub fail_on: &'static str,
}

impl<S: ArraySource> FailingSource<S> {
    pub fn new(inner: S, fail_on: &'static str) -> Self {
        Self { inner, fail_on }
    }
}

impl<S: ArraySource> ArraySource for FailingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        if key == self.fail_on {
            return Err(SourceError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("deliberate failure reading {key}"),
            )));
        }
        self.inner.array(key)
    }
}

/// Counts [`array`](ArraySource::array) calls.
///
/// The counter is shared, so it can be inspected after the source has
/// been moved into a reader.
pub struct CountingSource<S> {
    inner: S,
    reads: Arc<AtomicUsize>,
}

impl<S: ArraySource> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the read counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }

    /// Reads so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl<S: ArraySource> ArraySource for CountingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.array(key)
    }
}
