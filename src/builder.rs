use std::num::NonZero;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::board::Board;
use crate::cell::Terrain;
use crate::location::Location;

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// A character other than `. # ^ v < >` appeared.
    #[error("unrecognized character {found:?} at {location}")]
    UnknownTerrain { found: char, location: Location },
    /// A row was a different width than the first row.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    JaggedRow { row: usize, expected: usize, found: usize },
    /// Start and finish need separate rows, and rows need at least one cell.
    #[error("board must have at least two rows of nonzero width")]
    TooSmall,
    /// The top row has no floor cell.
    #[error("no floor cell on the top row to start from")]
    MissingStart,
    /// The top row has more than one floor cell.
    #[error("{0} floor cells on the top row, expected exactly one")]
    DuplicateStart(usize),
    /// The bottom row has no floor cell.
    #[error("no floor cell on the bottom row to finish at")]
    MissingFinish,
    /// The bottom row has more than one floor cell.
    #[error("{0} floor cells on the bottom row, expected exactly one")]
    DuplicateFinish(usize),
}

/// Every reason a trail map was rejected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("malformed trail map: {}", .0.iter().join("; "))]
pub struct MalformedBoard(pub Vec<BuilderInvalidReason>);

/// A builder for [`Board`]s, fed one row of text at a time.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Problems are collected rather than reported eagerly, so that [`build`](Self::build) can name all of them.
#[derive(Clone, Debug, Default)]
pub struct BoardBuilder {
    rows: Vec<Vec<Terrain>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl BoardBuilder {
    /// Append a row to the bottom of the board.
    ///
    /// May cause the builder to enter an invalid state if `row` contains an unknown character or its width differs from the first row.
    pub fn push_row(&mut self, row: &str) -> &mut Self {
        let y = self.rows.len();
        let mut cells = Vec::with_capacity(row.len());

        for (x, ch) in row.chars().enumerate() {
            match Terrain::try_from(ch) {
                Ok(terrain) => cells.push(terrain),
                Err(found) => {
                    self.invalid_reasons.push(BuilderInvalidReason::UnknownTerrain { found, location: Location(x, y) });
                    cells.push(Terrain::Wall);
                }
            }
        }

        if let Some(first) = self.rows.first() {
            if first.len() != cells.len() {
                self.invalid_reasons.push(BuilderInvalidReason::JaggedRow {
                    row: y,
                    expected: first.len(),
                    found: cells.len(),
                });
            }
        }

        self.rows.push(cells);
        self
    }

    /// Check the validity of this builder so far, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Start and finish are only checked by [`build`](Self::build), since more rows may follow.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    pub fn build(&self) -> Result<Board, MalformedBoard> {
        let mut reasons = self.invalid_reasons.clone();

        let height = self.rows.len();
        let width = self.rows.first().map_or(0, Vec::len);
        let (Some(width_nz), Some(height_nz)) = (NonZero::new(width), NonZero::new(height)) else {
            reasons.push(BuilderInvalidReason::TooSmall);
            return Err(MalformedBoard(reasons));
        };
        if height < 2 {
            reasons.push(BuilderInvalidReason::TooSmall);
        }

        let start = match Self::floor_in(&self.rows[0], 0) {
            Ok(location) => Some(location),
            Err(0) => {
                reasons.push(BuilderInvalidReason::MissingStart);
                None
            }
            Err(count) => {
                reasons.push(BuilderInvalidReason::DuplicateStart(count));
                None
            }
        };
        let finish = match Self::floor_in(&self.rows[height - 1], height - 1) {
            Ok(location) => Some(location),
            Err(0) => {
                reasons.push(BuilderInvalidReason::MissingFinish);
                None
            }
            Err(count) => {
                reasons.push(BuilderInvalidReason::DuplicateFinish(count));
                None
            }
        };

        match (start, finish) {
            (Some(start), Some(finish)) if reasons.is_empty() => {
                let cells = Array2::from_shape_fn((height, width), |(y, x)| self.rows[y][x]);
                Ok(Board {
                    cells,
                    dims: (width_nz, height_nz),
                    start,
                    finish,
                })
            }
            _ => Err(MalformedBoard(reasons)),
        }
    }

    // the unique floor cell of a row, or how many there were instead
    fn floor_in(row: &[Terrain], y: usize) -> Result<Location, usize> {
        let floors = row.iter()
            .positions(|cell| *cell == Terrain::Floor)
            .collect_vec();

        match floors.as_slice() {
            [x] => Ok(Location(*x, y)),
            _ => Err(floors.len()),
        }
    }
}
