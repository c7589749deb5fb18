//! Error types shared by every flatstore layer.

use std::io;
use std::path::PathBuf;

use crate::format::Format;
use crate::key::KeyError;

/// Errors raised by stores, codecs and file bindings.
///
/// Variants fall into three families, see [`Error::is_invalid_key`],
/// [`Error::is_format_failure`] and [`Error::is_io_failure`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed dotted key.
    #[error(transparent)]
    InvalidKey(#[from] KeyError),

    /// Codec failed to decode bytes.
    #[error("decode error ({format}): {message}")]
    Decode { format: Format, message: String },

    /// Codec failed to encode value.
    #[error("encode error ({format}): {message}")]
    Encode { format: Format, message: String },

    /// The decoded document is not a map at its root.
    #[error("document root must be a map, found {found}")]
    RootNotMap { found: &'static str },

    /// Format not supported by codec, or not derivable from a file name.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(Format),

    /// File creation, read, write or stat failed.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn decode(format: Format, message: impl Into<String>) -> Self {
        Error::Decode {
            format,
            message: message.into(),
        }
    }

    pub fn encode(format: Format, message: impl Into<String>) -> Self {
        Error::Encode {
            format,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::InvalidKey(_))
    }

    /// Content could not be turned into a store, or a store into content.
    pub fn is_format_failure(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. }
                | Error::Encode { .. }
                | Error::RootNotMap { .. }
                | Error::UnsupportedFormat(_)
        )
    }

    pub fn is_io_failure(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// An i/o failure because the file doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
