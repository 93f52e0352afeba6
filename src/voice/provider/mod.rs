//! Sources of pre-encoded Opus audio.

#[cfg(feature = "providers")]
pub mod dca;
#[cfg(feature = "providers")]
mod queue;

#[cfg(feature = "providers")]
pub use self::dca::{DcaMetadata, DcaProvider};
#[cfg(feature = "providers")]
pub use self::queue::{frame_queue, FrameSender, QueueProvider};
use super::ProviderError;

/// A source of Opus frames for an [`AudioSender`].
///
/// Each call hands out at most one 20ms frame. Providers are polled from inside the sender's
/// real-time loop, so [`provide_opus_frame`] must return quickly: any time spent here is taken
/// out of the frame's timing budget.
///
/// The provider belongs to whoever created it. The sender never calls [`close`]; the owner does,
/// once it no longer needs the audio.
///
/// [`AudioSender`]: super::AudioSender
/// [`provide_opus_frame`]: Self::provide_opus_frame
/// [`close`]: Self::close
pub trait OpusFrameProvider: Send + Sync {
    /// Returns the next Opus frame.
    ///
    /// An empty frame means there is no audio for this tick. [`ProviderError::Exhausted`] is
    /// handled the same way. Any other error is logged and the tick is skipped.
    fn provide_opus_frame(&self) -> Result<Vec<u8>, ProviderError>;

    /// Releases any resources held by the provider.
    fn close(&self);
}
