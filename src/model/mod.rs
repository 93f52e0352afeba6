//! Mappings of the voice gateway objects the sender signals with, with implementations for
//! (de)serialisation.
//!
//! A [`Conn`] implementation receives a [`SpeakingState`] from the sender and is expected to
//! forward it to the voice websocket; [`payload::build_speaking`] produces the message body for
//! that.
//!
//! [`Conn`]: crate::voice::Conn

pub mod id;
pub mod payload;

mod opcode;
mod speaking_state;

pub use self::opcode::Opcode;
pub use self::speaking_state::SpeakingState;
