use serde::{Serialize, Serializer};

/// The subset of [voice opcodes] a sending client produces.
///
/// [voice opcodes]: https://discord.com/developers/docs/topics/opcodes-and-status-codes#voice
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum Opcode {
    /// Used to inform Discord that the client has started or stopped speaking.
    Speaking,
}

impl Opcode {
    #[must_use]
    pub fn num(self) -> u8 {
        match self {
            Self::Speaking => 5,
        }
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.num())
    }
}
