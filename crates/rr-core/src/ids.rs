//! Strongly typed, zero-cost identifier wrappers.
//!
//! `NodeId` and `EdgeId` index straight into the network's arrays; callers
//! should prefer the `.index()` helpers over `id.0 as usize`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

/// Identity of a directed road segment: its `(from, to)` endpoint pair.
///
/// Both the network's edges and the congestion ledger's samples are keyed by
/// this value, so a sample survives a network rebuild as long as the node
/// numbering is unchanged.  The two directions of a two-way road are
/// distinct segments.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct SegmentId {
    pub from: NodeId,
    pub to: NodeId,
}

impl SegmentId {
    #[inline]
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// The opposite direction of the same road.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self { from: self.to, to: self.from }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from.0, self.to.0)
    }
}
