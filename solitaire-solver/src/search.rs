//! Meet-in-the-middle search.
//!
//! Phase 1 stores every position reachable from the start down to the
//! frontier. Playing backwards from the goal is playing forwards on the
//! complement, so the stored positions (complemented) are also every position
//! from which the goal can be reached, starting at `BOARD - pins_left` pegs.
//! Phase 2 walks forward from each stored frontier position until it hits
//! one of those. Phase 3 replays phase 1 to recover the paths to both ends
//! of the bridge found in phase 2.

use std::{convert::Infallible, ops::ControlFlow};

use log::{debug, error, info};
use rayon::prelude::*;

use crate::{
    HashTable, Insertion, Jump, Lookup, MoveTable, SearchConfig, SearchError, Solution,
    SolutionRecorder, State,
    layout::{BOARD, PINS},
};

const PATH_LEN: usize = BOARD as usize + 1;

pub(crate) enum Visit<B> {
    Expand,
    Stop,
    Found(B),
}

/// Decides what happens at each position of a [`Walker`] traversal.
pub(crate) trait Visitor {
    type Found;

    fn visit(&mut self, path: &Path, state: &State) -> Result<Visit<Self::Found>, SearchError>;
}

/// The jumps along the current path and the boards they lead to, indexed by
/// the peg count of the board the jump is played on.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    ranks: [usize; PATH_LEN],
    states: [State; PATH_LEN],
}

impl Path {
    fn new() -> Self {
        Path {
            ranks: [0; PATH_LEN],
            states: [State::default(); PATH_LEN],
        }
    }

    #[inline(always)]
    fn record(&mut self, pins: u8, rank: usize, next: State) {
        self.ranks[pins as usize] = rank;
        self.states[pins as usize] = next;
    }

    /// the board reached by the jump played with `pins` pegs
    #[inline(always)]
    pub(crate) fn state(&self, pins: u8) -> State {
        self.states[pins as usize]
    }

    #[inline(always)]
    pub(crate) fn rank(&self, pins: u8) -> usize {
        self.ranks[pins as usize]
    }
}

/// Depth first traversal over the jumps of a [`MoveTable`].
pub(crate) struct Walker<'t> {
    table: &'t MoveTable,
    pins_left: u8,
    path: Path,
}

impl<'t> Walker<'t> {
    pub(crate) fn new(table: &'t MoveTable, pins_left: u8) -> Self {
        Walker {
            table,
            pins_left,
            path: Path::new(),
        }
    }

    /// Visits `state` and, if asked to, every board below it.
    ///
    /// Empty ordinary holes are tried as landing holes first, in ascending
    /// order, then the centre. The first `Found` ends the whole traversal.
    pub(crate) fn descend<V: Visitor>(
        &mut self,
        state: State,
        visitor: &mut V,
    ) -> Result<ControlFlow<V::Found>, SearchError> {
        match visitor.visit(&self.path, &state)? {
            Visit::Expand => {}
            Visit::Stop => return Ok(ControlFlow::Continue(())),
            Visit::Found(found) => return Ok(ControlFlow::Break(found)),
        }
        let table = self.table;
        for landing in state.vacant_holes() {
            for jump in table.jumps_into(landing) {
                if !jump.allowed || !state.contains(jump.next) {
                    continue;
                }
                if self.is_redundant(&state, jump) {
                    continue;
                }
                let next = state.apply(jump.mask);
                self.path.record(state.pins, jump.rank, next);
                if let ControlFlow::Break(found) = self.descend(next, visitor)? {
                    return Ok(ControlFlow::Break(found));
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Two independent jumps lead to the same board in either order, only the
    /// order with ascending rank is played. Applies below the frontier only.
    #[inline(always)]
    fn is_redundant(&self, state: &State, jump: &Jump) -> bool {
        if state.pins >= self.pins_left {
            return false;
        }
        let last = &self.table[self.path.rank(state.pins + 1)];
        jump.rank < last.rank && !jump.mask.overlaps(&last.mask)
    }
}

fn admit(hash: &mut HashTable, state: &State) -> Result<bool, SearchError> {
    match hash.insert(state) {
        Insertion::Inserted => Ok(true),
        Insertion::Duplicate => Ok(false),
        Insertion::Full => {
            error!("hash table exhausted at {} pegs", state.pins);
            Err(SearchError::TableFull {
                stats: Box::new(hash.stats().clone()),
            })
        }
    }
}

/// phase 1
struct Enumerate<'h> {
    hash: &'h mut HashTable,
    pins_left: u8,
}

impl Visitor for Enumerate<'_> {
    type Found = Infallible;

    fn visit(&mut self, _: &Path, state: &State) -> Result<Visit<Infallible>, SearchError> {
        if admit(self.hash, state)? && state.pins > self.pins_left {
            Ok(Visit::Expand)
        } else {
            Ok(Visit::Stop)
        }
    }
}

/// Where the forward search meets the complemented backward search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinPoint {
    /// the stored frontier board phase 2 started from, canonical
    pub frontier: State,
    /// complement of the board phase 2 ended on, as reached
    pub real_final: State,
    /// canonical form of `real_final`
    pub rotated_final: State,
    /// quarter turns taking `real_final` to `rotated_final`
    pub rotation: usize,
    /// the boards after each jump from `frontier` on
    pub middle: Vec<State>,
}

/// phase 2
struct Join<'h> {
    hash: &'h HashTable,
    frontier: State,
    pins_left: u8,
    trailing: u8,
}

impl Visitor for Join<'_> {
    type Found = JoinPoint;

    fn visit(&mut self, path: &Path, state: &State) -> Result<Visit<JoinPoint>, SearchError> {
        if state.pins > self.trailing {
            return Ok(Visit::Expand);
        }
        let real_final = state.complement();
        if self.hash.lookup(&real_final) == Lookup::NotFound {
            return Ok(Visit::Stop);
        }
        let (rotated_final, rotation) = real_final.canonicalize();
        let middle = (self.trailing + 1..=self.pins_left)
            .rev()
            .map(|pins| path.state(pins))
            .collect();
        Ok(Visit::Found(JoinPoint {
            frontier: self.frontier,
            real_final,
            rotated_final,
            rotation,
            middle,
        }))
    }
}

/// phase 3
struct Locate<'h> {
    hash: &'h mut HashTable,
    join: &'h JoinPoint,
    pins_left: u8,
    recorder: SolutionRecorder,
    head: bool,
    tail: bool,
}

impl Locate<'_> {
    /// boards from the first jump down to the frontier
    fn leading(&self, path: &Path) -> impl Iterator<Item = State> + use<> {
        let path = path.clone();
        (self.pins_left + 1..=PINS).rev().map(move |pins| path.state(pins))
    }
}

impl Visitor for Locate<'_> {
    type Found = ();

    fn visit(&mut self, path: &Path, state: &State) -> Result<Visit<()>, SearchError> {
        if !admit(self.hash, state)? {
            return Ok(Visit::Stop);
        }
        if state.pins > self.pins_left {
            return Ok(Visit::Expand);
        }
        let (canonical, rotation) = state.canonicalize();
        if canonical.same_position(&self.join.frontier) {
            debug!("phase 3: leading part found");
            let head = self.leading(path).map(|s| s.rotate(rotation));
            self.recorder.extend(head);
            self.head = true;
        }
        if canonical.same_position(&self.join.rotated_final) {
            debug!("phase 3: trailing part found");
            let turns = (rotation + 4 - self.join.rotation) % 4;
            let tail = self
                .leading(path)
                .map(|s| s.rotate(turns).complement());
            self.recorder.extend(tail);
            self.tail = true;
        }
        if self.head && self.tail {
            Ok(Visit::Found(()))
        } else {
            Ok(Visit::Stop)
        }
    }
}

/// Owns everything a search needs: the jumps, the hash table and the settings.
pub struct Solver {
    config: SearchConfig,
    table: MoveTable,
    hash: HashTable,
}

impl Solver {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Solver {
            config,
            table: MoveTable::new(),
            hash: HashTable::new(config.prime_1, config.prime_2),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &MoveTable {
        &self.table
    }

    pub fn hash(&self) -> &HashTable {
        &self.hash
    }

    /// Phase 1: store every board from the start down to the frontier.
    pub fn enumerate(&mut self) -> Result<(), SearchError> {
        let pins_left = self.config.pins_left;
        info!("phase 1: full search from {PINS} to {pins_left}");
        self.hash.clear();
        let mut visitor = Enumerate {
            hash: &mut self.hash,
            pins_left,
        };
        match Walker::new(&self.table, pins_left).descend(State::START, &mut visitor)? {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(never) => match never {},
        }
        info!(
            "phase 1: {} boards stored, {} at the frontier",
            self.hash.len(),
            self.hash.frontier(pins_left).count()
        );
        Ok(())
    }

    /// Phase 2: bridge the frontier and its complement.
    ///
    /// Frontier boards are tried in slot order; the traversals run in
    /// parallel, but the first board in slot order with a bridge wins.
    pub fn join(&self) -> Result<JoinPoint, SearchError> {
        let pins_left = self.config.pins_left;
        let trailing = self.config.trailing_pins();
        info!("phase 2: traversal from {pins_left} to {trailing}");
        let found = self
            .hash
            .slots()
            .par_iter()
            .filter(|entry| entry.pins == pins_left)
            .find_map_first(|entry| {
                let mut visitor = Join {
                    hash: &self.hash,
                    frontier: *entry,
                    pins_left,
                    trailing,
                };
                match Walker::new(&self.table, pins_left).descend(*entry, &mut visitor) {
                    Ok(ControlFlow::Break(join)) => Some(Ok(join)),
                    Ok(ControlFlow::Continue(())) => None,
                    Err(err) => Some(Err(err)),
                }
            });
        let join = found.unwrap_or(Err(SearchError::NoJoin))?;
        info!(
            "phase 2: found, {:#010x} meets {:#010x}",
            join.frontier.id, join.real_final.id
        );
        Ok(join)
    }

    /// Phase 3: replay phase 1 until both ends of `join` are reached.
    pub fn locate(&mut self, join: &JoinPoint) -> Result<SolutionRecorder, SearchError> {
        let pins_left = self.config.pins_left;
        info!("phase 3: locate leading and trailing parts");
        self.hash.clear();
        let mut visitor = Locate {
            hash: &mut self.hash,
            join,
            pins_left,
            recorder: SolutionRecorder::new(),
            head: false,
            tail: false,
        };
        match Walker::new(&self.table, pins_left).descend(State::START, &mut visitor)? {
            ControlFlow::Break(()) => Ok(visitor.recorder),
            ControlFlow::Continue(()) => Err(SearchError::Unlocated),
        }
    }

    /// Runs all three phases.
    pub fn solve(&mut self) -> Result<Solution, SearchError> {
        self.enumerate()?;
        let join = self.join()?;
        let mut recorder = self.locate(&join)?;
        recorder.extend(join.middle);
        recorder.finish()
    }
}

/// Finds a solution with the given settings.
pub fn solve(config: SearchConfig) -> Result<Solution, SearchError> {
    Solver::new(config)?.solve()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// collects the boards with `pins` pegs, never stores anything
    struct Collect {
        pins: u8,
        seen: Vec<State>,
        visited: usize,
    }

    impl Visitor for Collect {
        type Found = Infallible;

        fn visit(&mut self, _: &Path, state: &State) -> Result<Visit<Infallible>, SearchError> {
            self.visited += 1;
            if state.pins > self.pins {
                return Ok(Visit::Expand);
            }
            self.seen.push(*state);
            Ok(Visit::Stop)
        }
    }

    fn collect(pins_left: u8, pins: u8) -> Collect {
        let table = MoveTable::new();
        let mut visitor = Collect {
            pins,
            seen: vec![],
            visited: 0,
        };
        let flow = Walker::new(&table, pins_left)
            .descend(State::START, &mut visitor)
            .unwrap();
        assert!(flow.is_continue());
        visitor
    }

    #[test]
    fn first_jumps_in_direction_order() {
        let first = collect(0, 31).seen;
        assert_eq!(first.len(), 4);
        for (count, state) in first.iter().enumerate() {
            assert_eq!(state.pins, 31);
            assert!(state.slack);
            assert_eq!(first[0].rotate(count), *state);
        }
    }

    #[test]
    fn pruning_keeps_every_board() {
        let full = collect(0, 27);
        let pruned = collect(PINS + 1, 27);
        let unique = |boards: &[State]| boards.iter().copied().collect::<HashSet<_>>();
        assert_eq!(unique(&full.seen), unique(&pruned.seen));
        assert!(pruned.visited < full.visited);
        for state in &pruned.seen {
            assert!(state.is_consistent());
        }
    }

    #[test]
    fn found_stops_the_traversal() {
        struct FirstAt(u8, usize);
        impl Visitor for FirstAt {
            type Found = State;

            fn visit(&mut self, _: &Path, state: &State) -> Result<Visit<State>, SearchError> {
                self.1 += 1;
                Ok(if state.pins == self.0 {
                    Visit::Found(*state)
                } else {
                    Visit::Expand
                })
            }
        }
        let table = MoveTable::new();
        let mut visitor = FirstAt(29, 0);
        let flow = Walker::new(&table, 0)
            .descend(State::START, &mut visitor)
            .unwrap();
        assert_eq!(visitor.1, 4);
        match flow {
            ControlFlow::Break(state) => assert_eq!(state.pins, 29),
            ControlFlow::Continue(()) => panic!("nothing found"),
        }
    }

    #[test]
    fn full_table_is_fatal() {
        let mut solver = Solver::new(SearchConfig {
            pins_left: 21,
            prime_1: 101,
            prime_2: 97,
        })
        .unwrap();
        match solver.enumerate() {
            Err(SearchError::TableFull { stats }) => {
                assert_eq!(stats.len(), 101);
                assert_eq!(stats.load_percent(), 100);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SearchConfig {
            pins_left: 12,
            ..Default::default()
        };
        assert!(matches!(
            Solver::new(config),
            Err(SearchError::Config(crate::ConfigError::Frontier(12)))
        ));
    }
}
