use async_trait::async_trait;

use super::ConnError;
use crate::model::SpeakingState;

/// The voice transport an [`AudioSender`] writes to.
///
/// Implementations own the UDP socket (including RTP framing and encryption) and the voice
/// websocket. The sender only hands over finished Opus frames and speaking-state changes.
///
/// Errors must distinguish a torn-down transport ([`ConnError::Closed`],
/// [`ConnError::NotConnected`]) from ordinary failures: the former stop the sender, the latter are
/// logged and skipped.
///
/// [`AudioSender`]: super::AudioSender
#[async_trait]
pub trait Conn: Send + Sync {
    /// Sends one Opus frame, real or silent, over the voice UDP socket.
    ///
    /// Returns the number of bytes written.
    async fn write(&self, frame: &[u8]) -> Result<usize, ConnError>;

    /// Tells the voice gateway whether, and how, this client is speaking.
    ///
    /// The sender bounds this call with the speaking timeout from its [`Config`], and drops the
    /// future once the timeout elapses.
    ///
    /// [`Config`]: super::Config
    async fn set_speaking(&self, state: SpeakingState) -> Result<(), ConnError>;
}
