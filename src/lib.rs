#![warn(missing_docs)]

//! # `switchback`
//!
//! An exact solver for the longest scenic hike across a trail map: a grid of forest (`#`), open paths (`.`) and steep icy slopes (`^ v < >`).
//! The hike starts at the only open cell of the top row, ends at the only open cell of the bottom row, and may never step on the same cell twice.
//! Begin by parsing a [`Board`] from text (or building one with a [`BoardBuilder`](builder::BoardBuilder)),
//! then call [`longest_hike()`](crate::Board::longest_hike) with a [`Mode`] deciding whether slopes can be climbed.
//!
//! # Internals
//! Finding a longest simple path is NP-hard in general, so the work goes into making the search space small and pruning it hard.
//!
//! A high level overview is as follows:
//!
//! 1. Trail maps are mostly long corridors one cell wide. Every cell with more than two open neighbors, plus the start and finish, becomes a junction;
//! every corridor between two junctions collapses into one weighted edge of a [`TrailGraph`](graph::TrailGraph).
//! Real maps shrink from thousands of cells to a few dozen junctions, so a set of junctions fits in one machine word.
//! 2. Any simple path through a set of junctions is a tree, so it can be no longer than a maximum spanning forest of those junctions.
//! That forest is cheap to find with Kruskal's algorithm over edges sorted once, heaviest first. See [`bound`].
//! 3. Partial hikes are explored best first, ordered by steps taken plus the spanning forest bound over everything not yet walked.
//! Once the most optimistic partial hike cannot beat the best complete hike, the search stops.
//!
//! A finish that cannot be reached at all is reported as [`None`], never as a zero-length hike.

pub use board::{Board, Trails};
pub use builder::BoardBuilder;
pub use cell::{Mode, Terrain};
pub use location::Location;
pub use solver::{SolverFailure, Steps, Strategy};

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub(crate) mod cell;
pub mod shape;
pub mod builder;
pub mod graph;
pub mod bound;
pub mod solver;
pub mod visited;
#[cfg(feature = "wasm")]
pub mod wasm;

/// Parse `trails` and find the length of its longest hike under `mode`.
///
/// Returns `Ok(None)` if the finish cannot be reached.
pub fn solve(trails: &str, mode: Mode) -> Result<Option<Steps>, SolverFailure> {
    let board: Board = trails.parse()?;
    board.longest_hike(mode, Strategy::default())
}
