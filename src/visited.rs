use std::fmt::{Debug, Formatter};
use std::ops::BitOr;

use crate::graph::JunctionId;

/// A set of junctions, one bit per [`JunctionId`].
///
/// Copied by value into every search state, so sibling branches never see each other's insertions.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Visited(u64);

impl Visited {
    /// The largest number of distinct junctions a set can track.
    pub const CAPACITY: usize = u64::BITS as usize;

    /// The set holding only `id`.
    pub fn single(id: JunctionId) -> Self {
        Self::default().with(id)
    }

    #[inline]
    pub fn contains(self, id: JunctionId) -> bool {
        self.0 & (1 << id) != 0
    }

    #[inline]
    #[must_use]
    pub fn with(self, id: JunctionId) -> Self {
        debug_assert!(id < Self::CAPACITY);
        Self(self.0 | (1 << id))
    }

    #[inline]
    #[must_use]
    pub fn without(self, id: JunctionId) -> Self {
        Self(self.0 & !(1 << id))
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = JunctionId> {
        (0..Self::CAPACITY).filter(move |id| self.contains(*id))
    }
}

impl BitOr for Visited {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<JunctionId> for Visited {
    fn from_iter<T: IntoIterator<Item = JunctionId>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

impl Debug for Visited {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
