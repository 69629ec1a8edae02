use strum::VariantArray;

use crate::location::Location;

/// The four directions of travel on a square grid.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// The result may lie outside the board; see [`Board::cell_at`](crate::Board::cell_at).
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Determine the direction from `a` to `b`, if they are orthogonally adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    /// All orthogonal neighbors of `location`, paired with the step reaching them.
    pub(crate) fn neighbors_of(location: Location) -> impl Iterator<Item = (Self, Location)> {
        Self::VARIANTS.iter().map(move |dir| (*dir, dir.attempt_from(location)))
    }
}
