use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;
use tracing::{debug, trace};

use crate::bound::SpanningBound;
use crate::builder::MalformedBoard;
use crate::graph::{CompactionFailure, JunctionId, TrailGraph, FINISH, START};
use crate::visited::Visited;

/// Length of a hike, counted in single-cell steps.
pub type Steps = u32;

/// Reasons a hike could not be searched for at all.
///
/// An unreachable finish is not a failure; see [`HikeSolver::longest_path`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SolverFailure {
    /// The trail map text was rejected before any search began.
    #[error(transparent)]
    Malformed(#[from] MalformedBoard),
    /// The trail map has more junctions than can be tracked.
    #[error(transparent)]
    Capacity(#[from] CompactionFailure),
}

/// How [`HikeSolver`] explores the trail graph.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, strum::Display, strum::VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Best-first search, pruned by a maximum spanning forest bound.
    #[default]
    BranchAndBound,
    /// Enumerate every simple path. Exponential; useful as a cross-check on small maps.
    Exhaustive,
}

// field order is the heap order: most optimistic first
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct State {
    priority: Steps,
    so_far: Steps,
    tip: JunctionId,
    // includes tip
    visited: Visited,
}

/// Finds the longest simple path from start to finish of a [`TrailGraph`].
///
/// All search state lives in the solver's own work list; the graph is only read.
pub struct HikeSolver<'a, C>
where
    C: Copy + Eq + Hash + Ord + Debug,
{
    graph: &'a TrailGraph<C>,
    bound: SpanningBound,
}

impl<'a, C> HikeSolver<'a, C>
where
    C: Copy + Eq + Hash + Ord + Debug,
{
    /// Prepares a solver over `graph`.
    pub fn new(graph: &'a TrailGraph<C>) -> Self {
        Self {
            graph,
            bound: SpanningBound::new(graph),
        }
    }

    /// Length of the longest simple path from start to finish, or [`None`] if the finish is unreachable.
    pub fn longest_path(&self, strategy: Strategy) -> Option<Steps> {
        match strategy {
            Strategy::BranchAndBound => self.branch_and_bound(),
            Strategy::Exhaustive => self.exhaustive(),
        }
    }

    /// Optimistic total for a hike at `tip` that has walked `so_far` steps through `visited`.
    ///
    /// The tip itself is where the rest of the hike starts, so only the junctions behind it are excluded.
    pub(crate) fn priority(&self, tip: JunctionId, visited: Visited, so_far: Steps) -> Steps {
        so_far + self.bound.upper_bound(visited.without(tip))
    }

    fn state(&self, tip: JunctionId, visited: Visited, so_far: Steps) -> State {
        State {
            priority: self.priority(tip, visited, so_far),
            so_far,
            tip,
            visited,
        }
    }

    fn branch_and_bound(&self) -> Option<Steps> {
        let mut best: Option<Steps> = None;
        let mut work = BinaryHeap::new();
        work.push(self.state(START, Visited::single(START), 0));

        let (mut pushed, mut expanded, mut pruned) = (1usize, 0usize, 0usize);

        while let Some(State { priority, so_far, tip, visited }) = work.pop() {
            if best.is_some_and(|best| priority < best) {
                // the heap is ordered by priority, so nothing left can do better
                pruned += 1 + work.len();
                break;
            }

            if tip == FINISH {
                if best.map_or(true, |best| so_far > best) {
                    trace!(so_far, priority, "longer hike found");
                    best = Some(so_far);
                }
                continue;
            }

            expanded += 1;
            for &(next, steps) in self.graph.neighbors(tip) {
                if visited.contains(next) {
                    continue;
                }

                let child = self.state(next, visited.with(next), so_far + steps);
                if best.is_some_and(|best| child.priority < best) {
                    pruned += 1;
                    continue;
                }
                work.push(child);
                pushed += 1;
            }
        }

        debug!(?best, pushed, expanded, pruned, "branch and bound finished");
        best
    }

    fn exhaustive(&self) -> Option<Steps> {
        let mut best: Option<Steps> = None;
        let mut stack = vec![(START, Visited::single(START), 0 as Steps)];
        let mut expanded = 0usize;

        while let Some((tip, visited, so_far)) = stack.pop() {
            if tip == FINISH {
                best = Some(best.map_or(so_far, |best| best.max(so_far)));
                continue;
            }

            expanded += 1;
            stack.extend(self.graph.neighbors(tip).iter()
                .filter(|(next, _)| !visited.contains(*next))
                .map(|&(next, steps)| (next, visited.with(next), so_far + steps)));
        }

        debug!(?best, expanded, "exhaustive search finished");
        best
    }
}
