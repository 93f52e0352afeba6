use std::io::{self, ErrorKind, Read};

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use super::OpusFrameProvider;
use crate::constants::{DCA_MAGIC, OPUS_STREAM_BUFF_SIZE};
use crate::internal::prelude::*;
use crate::voice::ProviderError;

/// Plays back Opus frames from a [DCA](https://github.com/bwmarrin/dca) stream.
///
/// After the header, a DCA stream is a sequence of Opus frames, each preceded by its length as a
/// little-endian `i16`. [`DcaProvider::new`] expects a DCA1 file, with its magic number and JSON
/// metadata block; [`DcaProvider::raw`] accepts the bare frame sequence.
///
/// The end of the stream is reported as [`ProviderError::Exhausted`]. Frames larger than
/// [`OPUS_STREAM_BUFF_SIZE`] are skipped over and reported as
/// [`ProviderError::FrameTooLarge`].
pub struct DcaProvider<R> {
    reader: Mutex<Option<R>>,
    metadata: Option<DcaMetadata>,
}

impl<R: Read> DcaProvider<R> {
    /// Reads and validates a DCA1 header, leaving the reader at the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidHeader`] if the magic number or metadata size is wrong,
    /// [`Error::Json`] if the metadata is malformed, or [`Error::Io`] if the reader fails.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;

        if header != DCA_MAGIC {
            return Err(Error::Provider(ProviderError::InvalidHeader));
        }

        let mut size = [0u8; 4];
        reader.read_exact(&mut size)?;
        let size = i32::from_le_bytes(size);

        // Sanity check
        if size < 2 {
            return Err(Error::Provider(ProviderError::InvalidHeader));
        }

        let mut raw_json = vec![0u8; size as usize];
        reader.read_exact(&mut raw_json)?;

        let metadata: DcaMetadata = serde_json::from_slice(&raw_json)?;
        debug!("DCA stream opened: {:?}", metadata.info.as_ref().and_then(|i| i.title.as_ref()));

        Ok(Self {
            reader: Mutex::new(Some(reader)),
            metadata: Some(metadata),
        })
    }

    /// Wraps a headerless stream of length-prefixed frames.
    pub fn raw(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            metadata: None,
        }
    }

    /// The metadata block of a DCA1 stream, if there was one.
    pub fn metadata(&self) -> Option<&DcaMetadata> {
        self.metadata.as_ref()
    }
}

fn read_frame(reader: &mut impl Read) -> StdResult<Vec<u8>, ProviderError> {
    let mut len = [0u8; 2];
    reader.read_exact(&mut len).map_err(eof_as_exhausted)?;
    let len = i16::from_le_bytes(len);

    let Ok(len) = usize::try_from(len) else {
        return Err(ProviderError::InvalidFrameLength(len));
    };

    if len > OPUS_STREAM_BUFF_SIZE {
        // Stay aligned on the next frame's length prefix.
        io::copy(&mut reader.by_ref().take(len as u64), &mut io::sink())?;

        return Err(ProviderError::FrameTooLarge(len));
    }

    let mut frame = vec![0u8; len];
    reader.read_exact(&mut frame).map_err(eof_as_exhausted)?;

    Ok(frame)
}

fn eof_as_exhausted(e: io::Error) -> ProviderError {
    if e.kind() == ErrorKind::UnexpectedEof {
        ProviderError::Exhausted
    } else {
        ProviderError::Io(e)
    }
}

impl<R: Read + Send> OpusFrameProvider for DcaProvider<R> {
    fn provide_opus_frame(&self) -> StdResult<Vec<u8>, ProviderError> {
        match self.reader.lock().as_mut() {
            Some(reader) => read_frame(reader),
            None => Err(ProviderError::Exhausted),
        }
    }

    fn close(&self) {
        self.reader.lock().take();
    }
}

/// Metadata block of a DCA1 file.
#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct DcaMetadata {
    pub dca: Dca,
    pub opus: Opus,
    pub info: Option<Info>,
    pub origin: Option<Origin>,
    pub extra: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct Dca {
    pub version: u64,
    pub tool: Tool,
}

#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct Tool {
    pub name: String,
    pub version: String,
    pub url: Option<String>,
    pub author: Option<String>,
}

/// Encoder settings the frames were produced with.
#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct Opus {
    pub mode: String,
    pub sample_rate: u32,
    pub frame_size: u64,
    pub abr: Option<u64>,
    pub vbr: bool,
    pub channels: u8,
}

#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct Info {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub cover: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct Origin {
    pub source: Option<String>,
    pub abr: Option<u64>,
    pub channels: Option<u8>,
    pub encoding: Option<String>,
    pub url: Option<String>,
}
