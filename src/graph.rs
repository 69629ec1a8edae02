use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use itertools::Itertools;
use petgraph::dot::Dot;
use petgraph::graphmap::DiGraphMap;
use thiserror::Error;
use tracing::debug;
use unordered_pair::UnorderedPair;

use crate::location::Location;
use crate::solver::Steps;
use crate::visited::Visited;

/// Dense identity of a junction, in `0..junction_count`.
pub type JunctionId = usize;

/// The junction every hike starts from.
pub const START: JunctionId = 0;
/// The junction every hike ends at.
pub const FINISH: JunctionId = 1;

/// Anything that can be walked cell by cell and compacted into a [`TrailGraph`].
///
/// The compactor only relies on the following:
/// - [`exits`](Self::exits) lists every open neighbor of a cell, ignoring direction of travel;
/// - a cell with at most two exits that is neither start nor finish is part of a corridor;
/// - [`can_step`](Self::can_step) decides whether a single step between two adjacent open cells is allowed.
pub trait TrailMap {
    /// Identifies a single cell.
    type Cell: Copy + Eq + Hash + Ord + Debug;

    /// Where every hike begins.
    fn start(&self) -> Self::Cell;
    /// Where every hike ends.
    fn finish(&self) -> Self::Cell;
    /// Every open cell, in a deterministic order.
    fn open_cells(&self) -> Vec<Self::Cell>;
    /// Open neighbors of `cell`, whether or not they can be stepped to.
    fn exits(&self, cell: Self::Cell) -> Vec<Self::Cell>;
    /// Whether a hiker standing on `from` may step onto the neighboring `to`.
    fn can_step(&self, from: Self::Cell, to: Self::Cell) -> bool;
}

/// A cell kept as a vertex of the compacted graph.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct Junction<C> {
    pub id: JunctionId,
    pub cell: C,
}

impl<C: Display> Display for Junction<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cell)
    }
}

/// Reasons compaction may fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CompactionFailure {
    /// More junctions than a [`Visited`] set can hold.
    #[error("{found} junctions exceed the supported maximum of {capacity}")]
    TooManyJunctions { found: usize, capacity: usize },
}

/// A trail map with every corridor collapsed into a single weighted edge between two junctions.
///
/// Junction 0 is always the start and junction 1 the finish; branch points follow in the order of [`TrailMap::open_cells`].
/// Built once, then only read.
#[derive(Clone)]
pub struct TrailGraph<C = Location>
where
    C: Copy + Eq + Hash + Ord,
{
    junctions: Vec<Junction<C>>,
    // directed, since slopes can make a corridor one-way
    graph: DiGraphMap<Junction<C>, Steps>,
    adjacency: Vec<Vec<(JunctionId, Steps)>>,
    // undirected, heaviest first
    trails: Vec<(UnorderedPair<JunctionId>, Steps)>,
}

impl<C> TrailGraph<C>
where
    C: Copy + Eq + Hash + Ord + Debug,
{
    /// Collapse the corridors of `map`.
    ///
    /// Fails if there are more junctions than [`Visited::CAPACITY`].
    pub fn compact<M>(map: &M) -> Result<Self, CompactionFailure>
    where
        M: TrailMap<Cell = C>,
    {
        let start = map.start();
        let finish = map.finish();

        let mut junctions = vec![
            Junction { id: START, cell: start },
            Junction { id: FINISH, cell: finish },
        ];
        let branches = map.open_cells().into_iter()
            .filter(|cell| *cell != start && *cell != finish && map.exits(*cell).len() > 2)
            .collect_vec();
        junctions.extend(branches.into_iter()
            .enumerate()
            .map(|(index, cell)| Junction { id: index + 2, cell }));

        if junctions.len() > Visited::CAPACITY {
            return Err(CompactionFailure::TooManyJunctions {
                found: junctions.len(),
                capacity: Visited::CAPACITY,
            });
        }

        let ids: HashMap<C, JunctionId> = junctions.iter().map(|j| (j.cell, j.id)).collect();

        let mut graph = DiGraphMap::with_capacity(junctions.len(), 4 * junctions.len());
        for junction in &junctions {
            graph.add_node(*junction);
        }

        let mut corridors = 0usize;
        for origin in &junctions {
            for first in map.exits(origin.cell) {
                let Some((dest, steps)) = Self::walk(map, &ids, origin.cell, first) else {
                    continue;
                };
                if dest == origin.id {
                    // a loop can never be part of a hike
                    continue;
                }
                corridors += 1;

                // parallel corridors collapse to the longest one
                let dest = junctions[dest];
                if graph.edge_weight(*origin, dest).map_or(true, |existing| *existing < steps) {
                    graph.add_edge(*origin, dest, steps);
                }
            }
        }

        let adjacency = junctions.iter()
            .map(|junction| graph.edges(*junction)
                .map(|(_, to, steps)| (to.id, *steps))
                .collect_vec())
            .collect_vec();

        let mut heaviest: HashMap<UnorderedPair<JunctionId>, Steps> = HashMap::new();
        for (from, to, steps) in graph.all_edges() {
            let entry = heaviest.entry(UnorderedPair(from.id.min(to.id), from.id.max(to.id))).or_insert(*steps);
            *entry = (*entry).max(*steps);
        }
        let trails = heaviest.into_iter()
            .sorted_by_key(|(ends, steps)| (std::cmp::Reverse(*steps), ends.0.min(ends.1), ends.0.max(ends.1)))
            .collect_vec();

        debug!(
            junctions = junctions.len(),
            corridors,
            directed = graph.edge_count(),
            undirected = trails.len(),
            "compacted trail map"
        );

        Ok(Self {
            junctions,
            graph,
            adjacency,
            trails,
        })
    }

    // follow the corridor leaving `origin` through `first` until it reaches a junction
    fn walk<M>(map: &M, ids: &HashMap<C, JunctionId>, origin: C, first: C) -> Option<(JunctionId, Steps)>
    where
        M: TrailMap<Cell = C>,
    {
        let mut last = origin;
        let mut here = first;
        let mut steps: Steps = 1;

        loop {
            if !map.can_step(last, here) {
                return None;
            }
            if let Some(id) = ids.get(&here) {
                return Some((*id, steps));
            }

            let exits = map.exits(here);
            assert!(exits.len() <= 2, "corridor cell {here:?} has {} exits", exits.len());
            // None at a dead end
            let next = exits.into_iter().find(|exit| *exit != last)?;
            last = here;
            here = next;
            steps += 1;
        }
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn junctions(&self) -> &[Junction<C>] {
        &self.junctions
    }

    /// Junctions reachable in one trail from `id`, with the trail's length.
    #[inline]
    pub fn neighbors(&self, id: JunctionId) -> &[(JunctionId, Steps)] {
        &self.adjacency[id]
    }

    /// Every trail as an undirected edge, heaviest first, ties broken by ascending endpoints.
    /// Only the heaviest trail between any two junctions is kept.
    pub fn trails(&self) -> &[(UnorderedPair<JunctionId>, Steps)] {
        &self.trails
    }

    /// The directed trail graph itself.
    pub fn graph(&self) -> &DiGraphMap<Junction<C>, Steps> {
        &self.graph
    }
}

impl<C> TrailGraph<C>
where
    C: Copy + Eq + Hash + Ord + Debug + Display,
{
    /// Render in Graphviz dot format, junctions labelled by cell and trails by length.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }
}
