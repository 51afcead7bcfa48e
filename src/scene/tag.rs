//! Capability tags
//!
//! Every game object carries a small set of capability flags. Only `MODEL`
//! has behavior attached today (draw + release); the rest are markers the
//! scene file can already express.

use bitflags::bitflags;

bitflags! {
    /// Capability flags attached to a game object.
    ///
    /// Bit values start at `2 << 0`, so bit 0 is never used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Tags: u32 {
        /// Object owns a renderable model
        const MODEL  = 2 << 0;
        /// Player-controlled object
        const PLAYER = 2 << 1;
        /// Object blocks movement
        const SOLID  = 2 << 2;
        /// Object emits light
        const LIGHT  = 2 << 3;
    }
}

impl serde::Serialize for Tags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Tags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

impl Tags {
    /// True if every bit of `query` is set.
    ///
    /// This is AND-equality, not intersection: `MODEL | LIGHT` only matches
    /// objects that carry both flags.
    pub fn has(self, query: Tags) -> bool {
        (self & query) == query
    }
}
