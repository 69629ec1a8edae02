//! Upper bounds on the length of any hike confined to a subset of junctions.
//!
//! A simple path is a tree, so no simple path through a set of junctions can be longer than a
//! maximum-weight spanning forest over those junctions. The forest is found with Kruskal's algorithm
//! over trails pre-sorted heaviest first, so each bound costs one near-linear scan.

use std::hash::Hash;

use itertools::Itertools;

use crate::graph::{JunctionId, TrailGraph};
use crate::solver::Steps;
use crate::visited::Visited;

/// Disjoint set forest over `0..len`.
///
/// Roots are merged deterministically: the larger root index links under the smaller.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parents: Vec<JunctionId>,
}

impl DisjointSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parents: (0..len).collect_vec(),
        }
    }

    pub(crate) fn find(&mut self, mut i: JunctionId) -> JunctionId {
        // path halving
        while self.parents[i] != i {
            let grandparent = self.parents[self.parents[i]];
            self.parents[i] = grandparent;
            i = grandparent;
        }
        i
    }

    /// Merge the sets holding `a` and `b`, returning `false` if they were already one set.
    pub(crate) fn union(&mut self, a: JunctionId, b: JunctionId) -> bool {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        self.parents[a.max(b)] = a.min(b);
        true
    }
}

/// Maximum spanning forest bound over the trails of one [`TrailGraph`].
#[derive(Clone, Debug)]
pub struct SpanningBound {
    // (lower id, higher id, steps), heaviest first
    trails: Vec<(JunctionId, JunctionId, Steps)>,
    junction_count: usize,
}

impl SpanningBound {
    pub fn new<C>(graph: &TrailGraph<C>) -> Self
    where
        C: Copy + Eq + Hash + Ord + std::fmt::Debug,
    {
        // already sorted by the graph
        let trails = graph.trails().iter()
            .map(|(ends, steps)| (ends.0.min(ends.1), ends.0.max(ends.1), *steps))
            .collect_vec();

        Self {
            trails,
            junction_count: graph.junction_count(),
        }
    }

    /// Total weight of a maximum spanning forest over every junction not in `excluded`.
    ///
    /// Never less than the length of any simple path that avoids `excluded`.
    pub fn upper_bound(&self, excluded: Visited) -> Steps {
        let available = self.junction_count - excluded.len();
        // a forest over n junctions has at most n - 1 edges
        let mut unions_left = available.saturating_sub(1);
        let mut forest = DisjointSet::new(self.junction_count);
        let mut total = 0;

        for &(a, b, steps) in &self.trails {
            if unions_left == 0 {
                break;
            }
            if excluded.contains(a) || excluded.contains(b) {
                continue;
            }
            if forest.union(a, b) {
                total += steps;
                unions_left -= 1;
            }
        }

        total
    }
}
