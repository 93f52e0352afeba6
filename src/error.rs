use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;

use serde_json::Error as JsonError;

use crate::voice::{ConnError, ProviderError};

/// The common result type between most library functions.
///
/// The library exposes functions which, for a result type, exposes only one type, rather than the
/// usual 2 (`Result<T, Error>`). This is because all functions that return a result return
/// warbler's [`Error`], so this is implied, and a "simpler" result is used.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A common error enum returned by most of the library's functionality within a custom
/// [`Result`].
///
/// The sending loop itself never returns these: it logs them or shuts itself down. They surface
/// from constructors, such as opening a [`DcaProvider`], and from [`Conn`] implementations.
///
/// [`DcaProvider`]: crate::voice::DcaProvider
/// [`Conn`]: crate::voice::Conn
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An error from an [`OpusFrameProvider`].
    ///
    /// [`OpusFrameProvider`]: crate::voice::OpusFrameProvider
    Provider(ProviderError),
    /// An error from the voice transport.
    Conn(ConnError),
    /// An error from the `serde_json` crate.
    Json(JsonError),
    /// An `std::io` error.
    Io(IoError),
}

impl Error {
    /// Whether this error means the voice transport can no longer be used.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Conn(e) if e.is_fatal())
    }
}

impl From<ProviderError> for Error {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

impl From<ConnError> for Error {
    fn from(e: ConnError) -> Self {
        Self::Conn(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Self::Json(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(inner) => fmt::Display::fmt(&inner, f),
            Self::Conn(inner) => fmt::Display::fmt(&inner, f),
            Self::Json(inner) => fmt::Display::fmt(&inner, f),
            Self::Io(inner) => fmt::Display::fmt(&inner, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Provider(inner) => Some(inner),
            Self::Conn(inner) => Some(inner),
            Self::Json(inner) => Some(inner),
            Self::Io(inner) => Some(inner),
        }
    }
}
