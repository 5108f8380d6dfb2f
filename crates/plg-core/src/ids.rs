//! Identifier newtypes for the lane graph.
//!
//! Nodes, vehicles, lanes and clusters are all plain `u32` indices in the
//! data, and mixing them up is the easiest bug to write in this pipeline: a
//! cluster id passed where a node is expected still indexes *something*.
//! Each kind gets its own wrapper.  `NodeId(n)` is the row and column `n` of
//! every transition matrix; `ClusterId` keys the conditioned matrices.

use std::fmt;

/// Declare an id newtype with ordering, hashing, `Display` and index
/// conversions.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Never issued by the pipeline; marks an unset slot.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Position in node-, vehicle- or cluster-indexed columns.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// `INVALID`, so a forgotten assignment fails loudly on lookup.
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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
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
    /// Index of a lane-graph node.  Stable for the lifetime of a graph once the
    /// node synthesizer has run.
    pub struct NodeId(u32);
}

typed_id! {
    /// Vehicle identifier.  Raw datasets reuse the same id for every visit a
    /// vehicle makes; the cleaner issues fresh ids per contiguous sub-path.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Lane identifier as recorded by the dataset.  Datasets without lane
    /// information use `LaneId(0)` throughout.
    pub struct LaneId(u32);
}

typed_id! {
    /// Label of an entry or exit cluster.
    pub struct ClusterId(u32);
}
