
//! Error type definitions.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::path::PathBuf;
use exr::meta::attribute::Text;
use crate::naming::decode_name;

pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;

/// The error type of the codec this crate delegates to.
pub use exr::error::Error as CodecError;


/// A result that may contain an exrsplit error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains an exrsplit error.
pub type UnitResult = Result<()>;


/// An error that aborts a split, merge, or list operation.
/// Recoverable naming problems are never errors,
/// they are reported as `Diagnostic`s instead.
#[derive(Debug)]
pub enum Error {

    /// The file cannot be opened or is not an OpenEXR image.
    NotContainer {

        /// The file that was requested.
        path: PathBuf,

        /// Why the file was rejected.
        reason: Cow<'static, str>,
    },

    /// The requested combination of arguments cannot be executed.
    /// Always detected before any file is touched.
    Usage(Cow<'static, str>),

    /// Pixels were requested for a channel that the container does not declare.
    MissingChannel(Text),

    /// The pixels passed for a channel do not have its sample type or sample count.
    MismatchedPixels(Text),

    /// The file uses a feature that splitting or merging cannot handle.
    NotSupported(Cow<'static, str>),

    /// The codec failed while decoding or encoding pixels.
    Codec(CodecError),

    /// The file system failed.
    Io(IoError),
}


impl Error {

    /// Create an error of the variant `Usage`.
    pub(crate) fn usage(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Usage(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub(crate) fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }

    /// Create an error of the variant `NotContainer`.
    pub(crate) fn not_container(path: impl Into<PathBuf>, reason: impl Into<Cow<'static, str>>) -> Self {
        Error::NotContainer { path: path.into(), reason: reason.into() }
    }
}

/// Enable using the `?` operator on `std::io::Result`.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        Error::Io(error)
    }
}

/// Enable using the `?` operator on `exr::error::Result`.
impl From<CodecError> for Error {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Io(io) => Error::Io(io),
            CodecError::NotSupported(message) => Error::NotSupported(message),
            other => Error::Codec(other),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotContainer { path, reason } => write!(
                formatter, "failed reading image `{}`: {} (file can't be opened or is not an OpenEXR image)",
                path.display(), reason
            ),

            Error::Usage(message) => write!(formatter, "invalid arguments: {}", message),
            Error::MissingChannel(name) => write!(formatter, "no channel named `{}` in this image", decode_name(name)),
            Error::MismatchedPixels(name) => write!(formatter, "pixels of channel `{}` do not match its format", decode_name(name)),
            Error::NotSupported(message) => write!(formatter, "not supported: {}", message),
            Error::Codec(error) => write!(formatter, "codec error: {}", error),
            Error::Io(error) => fmt::Display::fmt(error, formatter),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Codec(error) => Some(error),
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}
