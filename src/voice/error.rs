use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;

use serde_json::Error as JsonError;

/// An error returned from an [`OpusFrameProvider`].
///
/// [`OpusFrameProvider`]: super::OpusFrameProvider
#[derive(Debug)]
#[non_exhaustive]
pub enum ProviderError {
    /// The provider has no more audio to give.
    ///
    /// The sender treats this exactly like an empty frame: the connection falls silent, but the
    /// loop keeps running in case the provider is refilled.
    Exhausted,
    /// A DCA stream did not start with the expected header.
    InvalidHeader,
    /// A frame announced a negative length.
    InvalidFrameLength(i16),
    /// A frame announced a length larger than the read buffer.
    FrameTooLarge(usize),
    /// Reading the underlying stream failed.
    Io(IoError),
    /// Any other failure inside a user-supplied provider.
    Other(Box<dyn StdError + Send + Sync>),
}

impl ProviderError {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

impl From<IoError> for ProviderError {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => f.write_str("Provider has no more frames"),
            Self::InvalidHeader => f.write_str("Invalid DCA header"),
            Self::InvalidFrameLength(len) => write!(f, "Invalid Opus frame length {len}"),
            Self::FrameTooLarge(len) => write!(f, "Opus frame of {len} bytes exceeds read buffer"),
            Self::Io(inner) => fmt::Display::fmt(&inner, f),
            Self::Other(inner) => fmt::Display::fmt(&inner, f),
        }
    }
}

impl StdError for ProviderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(inner) => Some(inner),
            Self::Other(inner) => Some(&**inner),
            _ => None,
        }
    }
}

/// An error returned by a [`Conn`] while writing audio or updating the speaking state.
///
/// [`Conn`]: super::Conn
#[derive(Debug)]
#[non_exhaustive]
pub enum ConnError {
    /// The UDP transport has already been closed.
    Closed,
    /// The voice websocket is not connected, so no speaking update can be delivered.
    NotConnected,
    /// The speaking update did not complete within the configured timeout.
    Timeout,
    /// Writing to the socket failed.
    Io(IoError),
    /// Encoding a gateway message failed.
    Json(JsonError),
    /// Any other transport failure.
    Other(String),
}

impl ConnError {
    /// Whether the transport is unusable from now on.
    ///
    /// Fatal errors stop the sender; all others are logged and the next frame is attempted as
    /// normal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed | Self::NotConnected)
    }
}

impl From<IoError> for ConnError {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

impl From<JsonError> for ConnError {
    fn from(e: JsonError) -> Self {
        Self::Json(e)
    }
}

impl From<tokio::time::error::Elapsed> for ConnError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}

impl fmt::Display for ConnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("Voice transport closed"),
            Self::NotConnected => f.write_str("Voice gateway not connected"),
            Self::Timeout => f.write_str("Speaking update timed out"),
            Self::Io(inner) => fmt::Display::fmt(&inner, f),
            Self::Json(inner) => fmt::Display::fmt(&inner, f),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}

impl StdError for ConnError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(inner) => Some(inner),
            Self::Json(inner) => Some(inner),
            _ => None,
        }
    }
}
