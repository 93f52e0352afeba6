//! The real-time audio sender for Discord voice connections.
//!
//! An [`AudioSender`] sits between a source of Opus frames ([`OpusFrameProvider`]) and a voice
//! transport ([`Conn`]). It sends one frame every 20ms, pads the end of each burst with silent
//! frames, and keeps the voice gateway informed of whether the client is speaking.

mod config;
mod conn;
mod error;
pub mod provider;
mod sender;
mod speaking;

pub use self::config::Config;
pub use self::conn::Conn;
pub use self::error::{ConnError, ProviderError};
#[cfg(feature = "providers")]
pub use self::provider::{frame_queue, DcaMetadata, DcaProvider, FrameSender, QueueProvider};
pub use self::provider::OpusFrameProvider;
pub use self::sender::{AudioSender, AudioSenderCreateFn, DefaultAudioSender};
