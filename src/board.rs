use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;

use crate::builder::{BoardBuilder, MalformedBoard};
use crate::cell::{Mode, Terrain};
use crate::graph::{TrailGraph, TrailMap};
use crate::location::{Dimension, Location};
use crate::shape::Step;
use crate::solver::{HikeSolver, SolverFailure, Steps, Strategy};

/// A rectangular trail map with a fixed start on the top row and a fixed finish on the bottom row.
///
/// [`Board`]s should be built using a [`BoardBuilder`] or parsed from text with [`str::parse`].
/// Once built, a board is never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    pub(crate) cells: Array2<Terrain>,
    // width, height
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) start: Location,
    pub(crate) finish: Location,
}

impl Board {
    /// The terrain at `location`, or [`Terrain::Wall`] if it is off the board.
    pub fn cell_at(&self, location: Location) -> Terrain {
        self.cells.get(location.as_index()).copied().unwrap_or(Terrain::Wall)
    }

    /// Whether `location` lies on the board.
    pub fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }

    /// Width and height, in that order.
    pub fn dims(&self) -> (usize, usize) {
        (self.dims.0.get(), self.dims.1.get())
    }

    /// The only floor cell on the top row.
    pub fn start(&self) -> Location {
        self.start
    }

    /// The only floor cell on the bottom row.
    pub fn finish(&self) -> Location {
        self.finish
    }

    /// Whether a single step from `from` to the adjacent `to` is allowed under `mode`.
    pub fn can_step(&self, from: Location, to: Location, mode: Mode) -> bool {
        let Some(dir) = Step::direction_to(from, to) else {
            return false;
        };
        let target = self.cell_at(to);
        if !target.is_open() {
            return false;
        }

        match mode {
            Mode::Dry => true,
            Mode::Slippery => {
                // leaving a slope goes downhill only
                let leaves_downhill = self.cell_at(from).slope().map_or(true, |slope| slope == dir);
                // stepping onto a slope that points straight back is a climb
                let not_a_climb = target.slope().map_or(true, |slope| slope != dir.invert());
                leaves_downhill && not_a_climb
            }
        }
    }

    /// View this board as a [`TrailMap`] under the movement rules of `mode`.
    pub fn trails(&self, mode: Mode) -> Trails<'_> {
        Trails { board: self, mode }
    }

    /// Length of the longest hike from start to finish that never visits a cell twice.
    ///
    /// Returns `Ok(None)` if the finish cannot be reached at all.
    pub fn longest_hike(&self, mode: Mode, strategy: Strategy) -> Result<Option<Steps>, SolverFailure> {
        let graph = TrailGraph::compact(&self.trails(mode))?;
        Ok(HikeSolver::new(&graph).longest_path(strategy))
    }
}

impl FromStr for Board {
    type Err = MalformedBoard;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = BoardBuilder::default();
        // trailing blank lines are common at the end of input files
        for row in s.trim_end_matches(['\n', '\r']).lines() {
            builder.push_row(row.trim_end_matches('\r'));
        }
        builder.build()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().map(|cell| char::from(*cell)).join(""))?;
        }

        Ok(())
    }
}

/// A [`Board`] together with the [`Mode`] deciding how its slopes behave.
#[derive(Clone, Copy, Debug)]
pub struct Trails<'a> {
    board: &'a Board,
    mode: Mode,
}

impl Trails<'_> {
    /// The movement rules in effect.
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl TrailMap for Trails<'_> {
    type Cell = Location;

    fn start(&self) -> Location {
        self.board.start
    }

    fn finish(&self) -> Location {
        self.board.finish
    }

    fn open_cells(&self) -> Vec<Location> {
        // row-major
        self.board.cells.indexed_iter()
            .filter(|(_, cell)| cell.is_open())
            .map(|(index, _)| Location::from(index))
            .collect_vec()
    }

    fn exits(&self, cell: Location) -> Vec<Location> {
        Step::neighbors_of(cell)
            .map(|(_, neighbor)| neighbor)
            .filter(|neighbor| self.board.cell_at(*neighbor).is_open())
            .collect_vec()
    }

    fn can_step(&self, from: Location, to: Location) -> bool {
        self.board.can_step(from, to, self.mode)
    }
}
