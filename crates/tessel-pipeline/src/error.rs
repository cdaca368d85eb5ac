//! Errors surfaced by [`TrainingReader`](crate::TrainingReader).

use std::error::Error;
use std::fmt;

use tessel_core::{ConfigError, ShapeError, SourceError};

/// Failure producing a batch.
///
/// `Shape` and `Source` carry the name of the file being read. Both end
/// that file; the reader continues with the next one if iteration
/// continues.
#[derive(Debug)]
pub enum PipelineError {
    /// A file's arrays violate a shape precondition.
    Shape {
        /// [`ArraySource::name`](tessel_core::ArraySource::name) of the file.
        source_name: String,
        /// The violated precondition.
        error: ShapeError,
    },
    /// A file's container failed.
    Source {
        /// [`ArraySource::name`](tessel_core::ArraySource::name) of the file.
        source_name: String,
        /// The container error.
        error: SourceError,
    },
    /// The reader was built with an invalid configuration.
    Config(ConfigError),
}

impl PipelineError {
    pub(crate) fn shape_in(source_name: &str) -> impl FnOnce(ShapeError) -> Self + '_ {
        move |error| Self::Shape {
            source_name: source_name.to_string(),
            error,
        }
    }

    pub(crate) fn source_in(source_name: &str) -> impl FnOnce(SourceError) -> Self + '_ {
        move |error| Self::Source {
            source_name: source_name.to_string(),
            error,
        }
    }

    /// Name of the file that failed, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::Shape { source_name, .. } | Self::Source { source_name, .. } => {
                Some(source_name.as_str())
            }
            Self::Config(_) => None,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { source_name, error } => write!(f, "{source_name}: {error}"),
            Self::Source { source_name, error } => write!(f, "{source_name}: {error}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape { error, .. } => Some(error),
            Self::Source { error, .. } => Some(error),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_file_and_chain() {
        let e = PipelineError::shape_in("shard-3")(ShapeError::NonSquare { rows: 2, cols: 3 });
        assert_eq!(e.source_name(), Some("shard-3"));
        assert!(e.to_string().starts_with("shard-3: "), "got: {e}");
        assert!(Error::source(&e).is_some());

        let e = PipelineError::from(ConfigError::ZeroBatchSize);
        assert_eq!(e.source_name(), None);
        assert!(Error::source(&e).is_some());
    }
}
