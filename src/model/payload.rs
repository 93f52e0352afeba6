//! Message bodies sent over the voice websocket.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::id::UserId;
use super::{Opcode, SpeakingState};

/// Used to indicate which users are speaking, or to inform Discord that the client is now speaking.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Speaking {
    /// Function currently unknown.
    ///
    /// Docs suggest setting to `Some(0)` when sending this message as a client.
    pub delay: Option<u32>,
    /// How/whether a user has started/stopped speaking.
    pub speaking: SpeakingState,
    /// RTP synchronisation source of the speaker.
    pub ssrc: u32,
    /// User ID of the speaker, included in messages *received from* the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl Speaking {
    /// The body a client sends to announce its own speaking state.
    #[must_use]
    pub fn outgoing(speaking: SpeakingState, ssrc: u32) -> Self {
        Self {
            delay: Some(0),
            speaking,
            ssrc,
            user_id: None,
        }
    }
}

/// Builds the full `SPEAKING` gateway message for this client.
#[inline]
#[must_use]
pub fn build_speaking(speaking: SpeakingState, ssrc: u32) -> Value {
    json!({
        "op": Opcode::Speaking,
        "d": Speaking::outgoing(speaking, ssrc),
    })
}
