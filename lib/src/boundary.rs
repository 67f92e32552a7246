#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How a 2-dimensional world treats the neighbors of cells on its edges.
///
/// This only affects neighbor counting. Indexed access to a [`Grid`](crate::Grid)
/// always wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Boundary {
    /// The world is a torus.
    ///
    /// The neighbor of a cell off one edge is the cell at the opposite edge.
    #[default]
    Toroidal,

    /// The world has edges.
    ///
    /// Neighbors off the edge are considered dead.
    Bounded,
}

impl Boundary {
    /// Find the index of a neighbor along one axis.
    ///
    /// `index` must be in `0..len`. Returns [`None`] if the neighbor is off the edge
    /// of a bounded world.
    #[inline]
    pub fn neighbor(self, index: usize, offset: isize, len: usize) -> Option<usize> {
        debug_assert!(index < len);

        let neighbor = index as isize + offset;
        let len = len as isize;

        match self {
            Self::Toroidal => Some(neighbor.rem_euclid(len) as usize),
            Self::Bounded => (0..len).contains(&neighbor).then_some(neighbor as usize),
        }
    }
}
