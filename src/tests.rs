#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};
    use std::iter::once;

    use itertools::Itertools;
    use petgraph::graphmap::UnGraphMap;
    use proptest::prelude::*;
    use strum::VariantArray;

    use crate::bound::{DisjointSet, SpanningBound};
    use crate::builder::{BoardBuilder, BuilderInvalidReason, MalformedBoard};
    use crate::graph::{CompactionFailure, JunctionId, TrailGraph, TrailMap, FINISH, START};
    use crate::shape::Step;
    use crate::solver::{HikeSolver, SolverFailure, Steps};
    use crate::visited::Visited;
    use crate::{solve, Board, Location, Mode, Terrain};

    const LOOPS: &str = "#.#####
#.....#
#.#.#.#
#.#.#.#
#.....#
#####.#
";

    // LOOPS with the middle corridor made one-way, downhill
    const ONE_WAY: &str = "#.#####
#.....#
#.#v#.#
#.#.#.#
#.....#
#####.#
";

    const CORRIDOR: &str = "#.####
#.####
#....#
####.#
####.#
####.#
";

    const HIKING_TRAILS: &str = "#.#####################
#.......#########...###
#######.#########.#.###
###.....#.>.>.###.#.###
###v#####.#v#.###.#.###
###.>...#.#.#.....#...#
###v###.#.#.#########.#
###...#.#.#.......#...#
#####.#.#.#######.#.###
#.....#.#.#.......#...#
#.#####.#.#.#########v#
#.#...#...#...###...>.#
#.#.#v#######v###.###v#
#...#.>.#...>.>.#.###.#
#####v#.#.###v#.#.###.#
#.....#...#...#.#.#...#
#.#########.###.#.#.###
#...###...#...#...#.###
###.###.#.###v#####v###
#...#...#.#.>.>.#.>.###
#.###.###.#.###.#.#v###
#.....###...###...#...#
#####################.#
";

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    fn longest(text: &str, mode: Mode, strategy: crate::Strategy) -> Option<Steps> {
        board(text).longest_hike(mode, strategy).unwrap()
    }

    // straightforward depth-first search over raw cells
    fn brute_force(board: &Board, mode: Mode) -> Option<Steps> {
        fn go(board: &Board, mode: Mode, here: Location, seen: &mut HashSet<Location>, so_far: Steps, best: &mut Option<Steps>) {
            if here == board.finish() {
                *best = (*best).max(Some(so_far));
                return;
            }

            let directions = match (mode, board.cell_at(here)) {
                (Mode::Slippery, Terrain::Slope(dir)) => vec![dir],
                _ => Step::VARIANTS.to_vec(),
            };
            for dir in directions {
                let next = dir.attempt_from(here);
                if board.cell_at(next).is_open() && seen.insert(next) {
                    go(board, mode, next, seen, so_far + 1, best);
                    seen.remove(&next);
                }
            }
        }

        let mut best = None;
        let mut seen = HashSet::from([board.start()]);
        go(board, mode, board.start(), &mut seen, 0, &mut best);
        best
    }

    // longest way from `tip` to the finish avoiding `visited`, by enumeration
    fn longest_completion(graph: &TrailGraph, tip: JunctionId, visited: Visited) -> Option<Steps> {
        if tip == FINISH {
            return Some(0);
        }

        graph.neighbors(tip).iter()
            .filter(|(next, _)| !visited.contains(*next))
            .filter_map(|&(next, steps)| longest_completion(graph, next, visited.with(next)).map(|rest| rest + steps))
            .max()
    }

    fn assert_admissible_from(solver: &HikeSolver<Location>, graph: &TrailGraph, tip: JunctionId, visited: Visited, so_far: Steps) {
        if let Some(rest) = longest_completion(graph, tip, visited) {
            let priority = solver.priority(tip, visited, so_far);
            assert!(priority >= so_far + rest, "bound {priority} below reachable {} at {tip} with {visited:?}", so_far + rest);
        }
        if tip == FINISH {
            return;
        }

        for &(next, steps) in graph.neighbors(tip) {
            if !visited.contains(next) {
                assert_admissible_from(solver, graph, next, visited.with(next), so_far + steps);
            }
        }
    }

    fn trail_maps() -> impl Strategy<Value = String> {
        (3usize..=5, 3usize..=4)
            .prop_filter("at most 20 cells", |(width, height)| width * height <= 20)
            .prop_flat_map(|(width, height)| (
                Just(width),
                0..width,
                0..width,
                prop::collection::vec(prop::sample::select(vec!['#', '.', '.', '.', '>', '<', 'v', '^']), width * (height - 2)),
            ))
            .prop_map(|(width, start, finish, inner)| {
                let mut text = String::new();
                text.extend((0..width).map(|x| if x == start { '.' } else { '#' }));
                text.push('\n');
                for row in inner.chunks(width) {
                    text.extend(row);
                    text.push('\n');
                }
                text.extend((0..width).map(|x| if x == finish { '.' } else { '#' }));
                text.push('\n');
                text
            })
    }

    // a compacted graph drawn back out as one-cell-wide corridors
    #[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Ord, PartialOrd)]
    enum Spot {
        Junction(Location),
        Corridor(usize, Steps),
    }

    struct Expanded {
        graph: UnGraphMap<Spot, ()>,
        start: Spot,
        finish: Spot,
    }

    impl Expanded {
        fn from_trails(compacted: &TrailGraph) -> Self {
            let spot = |id: JunctionId| Spot::Junction(compacted.junctions()[id].cell);

            let mut graph = UnGraphMap::new();
            for junction in compacted.junctions() {
                graph.add_node(Spot::Junction(junction.cell));
            }
            for (index, (ends, steps)) in compacted.trails().iter().enumerate() {
                let chain = once(spot(ends.0))
                    .chain((1..*steps).map(|step| Spot::Corridor(index, step)))
                    .chain(once(spot(ends.1)))
                    .collect_vec();
                for (a, b) in chain.iter().tuple_windows() {
                    graph.add_edge(*a, *b, ());
                }
            }

            Self {
                graph,
                start: spot(START),
                finish: spot(FINISH),
            }
        }
    }

    impl TrailMap for Expanded {
        type Cell = Spot;

        fn start(&self) -> Spot {
            self.start
        }

        fn finish(&self) -> Spot {
            self.finish
        }

        fn open_cells(&self) -> Vec<Spot> {
            self.graph.nodes().collect_vec()
        }

        fn exits(&self, cell: Spot) -> Vec<Spot> {
            self.graph.neighbors(cell).collect_vec()
        }

        fn can_step(&self, from: Spot, to: Spot) -> bool {
            self.graph.contains_edge(from, to)
        }
    }

    fn trail_set<C>(graph: &TrailGraph<C>, location_of: impl Fn(C) -> Location) -> BTreeSet<(Location, Location, Steps)>
    where
        C: Copy + Eq + std::hash::Hash + Ord + std::fmt::Debug,
    {
        graph.trails().iter()
            .map(|(ends, steps)| {
                let a = location_of(graph.junctions()[ends.0].cell);
                let b = location_of(graph.junctions()[ends.1].cell);
                (a.min(b), a.max(b), *steps)
            })
            .collect()
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(board(LOOPS).to_string(), LOOPS);
        assert_eq!(board(HIKING_TRAILS).to_string(), HIKING_TRAILS);
    }

    #[test]
    fn start_and_finish() {
        let board = board(LOOPS);
        assert_eq!(board.start(), Location(1, 0));
        assert_eq!(board.finish(), Location(5, 5));
        assert_eq!(board.dims(), (7, 6));
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let board = board(LOOPS);
        assert_eq!(board.cell_at(Location(1, 0)), Terrain::Floor);
        assert_eq!(board.cell_at(Step::Up.attempt_from(Location(1, 0))), Terrain::Wall);
        assert_eq!(board.cell_at(Location(7, 1)), Terrain::Wall);
        assert_eq!(board.cell_at(Location(5, 6)), Terrain::Wall);
        assert!(!board.in_bounds(Location(5, 6)));
    }

    #[test]
    fn jagged_rows_rejected() {
        let err = "#.#\n#..#\n#.#\n".parse::<Board>().unwrap_err();
        assert_eq!(err, MalformedBoard(vec![BuilderInvalidReason::JaggedRow { row: 1, expected: 3, found: 4 }]));
    }

    #[test]
    fn start_and_finish_must_be_unique() {
        let err = "###\n...\n.#.\n".parse::<Board>().unwrap_err();
        assert_eq!(err, MalformedBoard(vec![
            BuilderInvalidReason::MissingStart,
            BuilderInvalidReason::DuplicateFinish(2),
        ]));
    }

    #[test]
    fn unknown_terrain_rejected() {
        let err = "#.#\n#x#\n#.#\n".parse::<Board>().unwrap_err();
        assert_eq!(err, MalformedBoard(vec![BuilderInvalidReason::UnknownTerrain { found: 'x', location: Location(1, 1) }]));
    }

    #[test]
    fn single_row_rejected() {
        let err = BoardBuilder::default().push_row("#.#").build().unwrap_err();
        assert!(err.0.contains(&BuilderInvalidReason::TooSmall));

        let err = BoardBuilder::default().build().unwrap_err();
        assert_eq!(err, MalformedBoard(vec![BuilderInvalidReason::TooSmall]));
    }

    #[test]
    fn builder_reports_early() {
        let mut builder = BoardBuilder::default();
        builder.push_row("#.#");
        assert!(builder.is_valid().is_none());
        builder.push_row("#.");
        assert_eq!(builder.is_valid().map(Vec::len), Some(1));
    }

    #[test]
    fn slopes_only_lead_downhill() {
        let board = board("#.#\n#^#\n#.#\n");
        assert!(!board.can_step(Location(1, 0), Location(1, 1), Mode::Slippery));
        assert!(board.can_step(Location(1, 0), Location(1, 1), Mode::Dry));
        assert!(board.can_step(Location(1, 2), Location(1, 1), Mode::Slippery));
        assert!(board.can_step(Location(1, 1), Location(1, 0), Mode::Slippery));
        assert!(!board.can_step(Location(1, 1), Location(1, 2), Mode::Slippery));
        // not adjacent
        assert!(!board.can_step(Location(1, 0), Location(1, 2), Mode::Dry));
    }

    #[test]
    fn compacts_loops() {
        let graph = TrailGraph::compact(&board(LOOPS).trails(Mode::Dry)).unwrap();

        assert_eq!(graph.junction_count(), 6);
        assert_eq!(graph.junctions()[START].cell, Location(1, 0));
        assert_eq!(graph.junctions()[FINISH].cell, Location(5, 5));
        // branch points in row-major order
        assert_eq!(graph.junctions()[2..].iter().map(|j| j.cell).collect_vec(),
                   vec![Location(1, 1), Location(3, 1), Location(3, 4), Location(5, 4)]);

        assert_eq!(graph.trails().iter().map(|(_, steps)| *steps).collect_vec(), vec![5, 5, 3, 2, 2, 1, 1]);
        assert_eq!(graph.neighbors(START), &[(2, 1)]);
        assert_eq!(graph.graph().edge_count(), 14);
    }

    #[test]
    fn slopes_make_trails_one_way() {
        let slippery = TrailGraph::compact(&board(ONE_WAY).trails(Mode::Slippery)).unwrap();
        let dry = TrailGraph::compact(&board(ONE_WAY).trails(Mode::Dry)).unwrap();

        // (3, 1) down to (3, 4) only
        assert!(slippery.neighbors(3).contains(&(4, 3)));
        assert!(!slippery.neighbors(4).contains(&(3, 3)));
        assert!(dry.neighbors(4).contains(&(3, 3)));
        // the bound still sees the trail
        assert_eq!(slippery.trails().len(), dry.trails().len());
    }

    #[test]
    fn spanning_bound() {
        let graph = TrailGraph::compact(&board(LOOPS).trails(Mode::Dry)).unwrap();
        let bound = SpanningBound::new(&graph);

        assert_eq!(bound.upper_bound(Visited::default()), 15);
        // without (1, 1) the start is cut off
        assert_eq!(bound.upper_bound(Visited::single(2)), 9);
        assert_eq!(bound.upper_bound((0..6).collect()), 0);
    }

    #[test]
    fn disjoint_set() {
        let mut forest = DisjointSet::new(5);
        assert!(forest.union(3, 4));
        assert!(forest.union(1, 4));
        assert!(!forest.union(3, 1));
        assert_eq!(forest.find(4), 1);
        assert_ne!(forest.find(0), forest.find(2));
    }

    #[test]
    fn visited_set() {
        let visited = Visited::single(0).with(5).with(63);
        assert!(visited.contains(5));
        assert!(!visited.contains(4));
        assert_eq!(visited.len(), 3);
        assert_eq!(visited.without(5).iter().collect_vec(), vec![0, 63]);
        assert_eq!(visited | Visited::single(4), [0, 4, 5, 63].into_iter().collect());
        assert!(Visited::default().is_empty());
    }

    #[test]
    fn longest_through_loops() {
        for strategy in crate::Strategy::VARIANTS.iter().copied() {
            assert_eq!(longest(LOOPS, Mode::Dry, strategy), Some(15));
            assert_eq!(longest(LOOPS, Mode::Slippery, strategy), Some(15));
        }
        assert_eq!(brute_force(&board(LOOPS), Mode::Dry), Some(15));
    }

    #[test]
    fn one_way_trail_shortens_hike() {
        for strategy in crate::Strategy::VARIANTS.iter().copied() {
            assert_eq!(longest(ONE_WAY, Mode::Slippery, strategy), Some(9));
            assert_eq!(longest(ONE_WAY, Mode::Dry, strategy), Some(15));
        }
    }

    #[test]
    fn single_corridor() {
        let graph = TrailGraph::compact(&board(CORRIDOR).trails(Mode::Slippery)).unwrap();
        assert_eq!(graph.junction_count(), 2);
        assert_eq!(graph.neighbors(START), &[(FINISH, 8)]);
        assert_eq!(longest(CORRIDOR, Mode::Slippery, crate::Strategy::BranchAndBound), Some(8));
    }

    #[test]
    fn unclimbable_slope() {
        assert_eq!(solve("#.#\n#^#\n#.#\n", Mode::Slippery), Ok(None));
        assert_eq!(solve("#.#\n#^#\n#.#\n", Mode::Dry), Ok(Some(2)));
    }

    #[test]
    fn disconnected_is_not_zero() {
        let text = "#.###\n#.###\n#####\n###.#\n###.#\n";
        for mode in [Mode::Slippery, Mode::Dry] {
            for strategy in crate::Strategy::VARIANTS.iter().copied() {
                assert_eq!(longest(text, mode, strategy), None);
            }
        }
    }

    #[test]
    fn hiking_trails() {
        for strategy in crate::Strategy::VARIANTS.iter().copied() {
            assert_eq!(longest(HIKING_TRAILS, Mode::Slippery, strategy), Some(94));
            assert_eq!(longest(HIKING_TRAILS, Mode::Dry, strategy), Some(154));
        }
    }

    #[test]
    fn too_many_junctions() {
        let width = 12;
        let mut text = format!("#.{}\n", "#".repeat(width - 2));
        for _ in 0..10 {
            text.push_str(&format!("#{}#\n", ".".repeat(width - 2)));
        }
        text.push_str(&format!("{}.#\n", "#".repeat(width - 2)));

        assert!(matches!(
            solve(&text, Mode::Dry),
            Err(SolverFailure::Capacity(CompactionFailure::TooManyJunctions { capacity: 64, .. }))
        ));
    }

    #[test]
    fn malformed_through_solve() {
        assert!(matches!(solve("#.#\n#.#.\n#.#\n", Mode::Dry), Err(SolverFailure::Malformed(_))));
    }

    #[test]
    fn dot_output() {
        let graph = TrailGraph::compact(&board(CORRIDOR).trails(Mode::Dry)).unwrap();
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("(1, 0)"));
        assert!(dot.contains("(4, 5)"));
        assert!(dot.contains('8'));
    }

    #[test]
    fn recompaction_is_idempotent() {
        for text in [LOOPS, HIKING_TRAILS, CORRIDOR] {
            let compacted = TrailGraph::compact(&board(text).trails(Mode::Dry)).unwrap();
            let recompacted = TrailGraph::compact(&Expanded::from_trails(&compacted)).unwrap();

            assert_eq!(recompacted.junction_count(), compacted.junction_count());
            assert_eq!(
                trail_set(&recompacted, |spot| match spot {
                    Spot::Junction(location) => location,
                    Spot::Corridor(..) => panic!("corridor cell {spot:?} became a junction"),
                }),
                trail_set(&compacted, |location| location),
            );
        }
    }

    proptest! {
        #[test]
        fn matches_brute_force(text in trail_maps()) {
            let board = board(&text);
            for mode in [Mode::Slippery, Mode::Dry] {
                let expected = brute_force(&board, mode);
                for strategy in crate::Strategy::VARIANTS.iter().copied() {
                    prop_assert_eq!(board.longest_hike(mode, strategy).unwrap(), expected, "{} {}", mode, strategy);
                }
            }
        }

        #[test]
        fn bound_is_admissible(text in trail_maps()) {
            for mode in [Mode::Slippery, Mode::Dry] {
                let graph = TrailGraph::compact(&board(&text).trails(mode)).unwrap();
                let solver = HikeSolver::new(&graph);
                assert_admissible_from(&solver, &graph, START, Visited::single(START), 0);
            }
        }

        #[test]
        fn slopes_never_lengthen(text in trail_maps()) {
            let board = board(&text);
            let slippery = board.longest_hike(Mode::Slippery, crate::Strategy::BranchAndBound).unwrap();
            let dry = board.longest_hike(Mode::Dry, crate::Strategy::BranchAndBound).unwrap();
            // None orders below any length
            prop_assert!(slippery <= dry);
        }
    }
}
