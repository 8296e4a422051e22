use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing round files.
///
/// All of these are fatal to the round; no partial output is ever left
/// referenced by a caller.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("corpus is malformed:\n{}", .defects.join("\n"))]
    Malformed { defects: Vec<String> },
}

impl FileError {
    pub(crate) fn parse(path: &std::path::Path, line: usize, message: impl Into<String>) -> Self {
        FileError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_file_and_line() {
        let err = FileError::parse(std::path::Path::new("round.data"), 7, "bad value");
        assert_eq!(err.to_string(), "round.data:7: bad value");
    }

    #[test]
    fn malformed_error_lists_defects() {
        let err = FileError::Malformed {
            defects: vec!["first".into(), "second".into()],
        };
        assert_eq!(err.to_string(), "corpus is malformed:\nfirst\nsecond");
    }
}
