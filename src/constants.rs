//! A set of constants used by the library.

use std::time::Duration;

/// Number of audio frames/packets to be sent per second.
pub const AUDIO_FRAME_RATE: usize = 50;

/// Length (in milliseconds) of any audio frame.
pub const FRAME_LEN_MS: usize = 1000 / AUDIO_FRAME_RATE;

/// Length of time between any two audio frames.
pub const TIMESTEP_LENGTH: Duration = Duration::from_millis(FRAME_LEN_MS as u64);

/// Opus silent frame, used to signal speech end (and prevent audio glitching on the receiving
/// side).
pub const SILENT_FRAME: [u8; 3] = [0xf8, 0xff, 0xfe];

/// Number of [`SILENT_FRAME`]s sent after audio stops, before the client stops speaking.
pub const SILENCE_FRAME_COUNT: u8 = 5;

/// Upper bound on a single speaking-state update sent over the voice gateway.
pub const SPEAKING_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of timesteps the send loop may fall behind before it stops catching up and resyncs its
/// cadence to the current time.
pub const MAX_FRAME_DRIFT: u32 = 3;

/// Size of the buffer used to read one Opus frame from a stream.
///
/// Frames announcing a larger length than this are rejected.
pub const OPUS_STREAM_BUFF_SIZE: usize = 4000;

/// Magic bytes at the start of a DCA1 file.
pub const DCA_MAGIC: [u8; 4] = *b"DCA1";
