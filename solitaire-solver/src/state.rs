use std::fmt::{Display, Formatter, Write};

use crate::{
    jump::Mask,
    layout::{BOARD, Hole, PINS, SIZE, SLACK, hole_at},
};

/// A board position.
///
/// `id` holds one bit per ordinary hole (set = occupied), `slack` the centre
/// hole and `pins` the number of pegs, so that
/// `id.count_ones() + slack == pins` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct State {
    pub id: u32,
    pub slack: bool,
    pub pins: u8,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        for y in 0..SIZE {
            let mut line = String::new();
            for x in 0..SIZE {
                match hole_at((y, x)) {
                    Some(hole) if self.occupied(hole) => line.push_str("* "),
                    Some(_) => line.push_str(". "),
                    None => line.push_str("  "),
                }
            }
            f.write_str(line.trim_end())?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl State {
    /// full board, centre empty
    pub const START: State = State {
        id: u32::MAX,
        slack: false,
        pins: PINS,
    };

    /// a single peg left in the centre
    pub const GOAL: State = State {
        id: 0,
        slack: true,
        pins: 1,
    };

    pub fn new(id: u32, slack: bool) -> Self {
        let pins = id.count_ones() as u8 + slack as u8;
        State { id, slack, pins }
    }

    #[inline(always)]
    pub fn occupied(&self, hole: Hole) -> bool {
        if hole == SLACK {
            self.slack
        } else {
            self.id & (1 << hole) != 0
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.id.count_ones() + self.slack as u32 == self.pins as u32
    }

    /// Empty holes in search order: ordinary holes ascending, then the centre.
    #[inline]
    pub fn vacant_holes(&self) -> impl Iterator<Item = Hole> + use<> {
        let id = self.id;
        (0..SLACK)
            .filter(move |hole| id & (1 << hole) == 0)
            .chain((!self.slack).then_some(SLACK))
    }

    /// whether every hole of `mask` holds a peg
    #[inline(always)]
    pub fn contains(&self, mask: Mask) -> bool {
        self.id & mask.id == mask.id && (self.slack || !mask.slack)
    }

    #[inline(always)]
    pub fn apply(&self, mask: Mask) -> State {
        debug_assert!(self.pins > 1);
        State {
            id: self.id ^ mask.id,
            slack: self.slack ^ mask.slack,
            pins: self.pins - 1,
        }
    }

    /// Positions are compared by their holes only; the peg count follows from them.
    #[inline(always)]
    pub fn same_position(&self, other: &State) -> bool {
        self.id == other.id && self.slack == other.slack
    }

    /// Rotates the board by `count` quarter turns clockwise.
    ///
    /// A quarter turn moves hole `n` to hole `n + 8` (see [`crate::layout`]),
    /// so rotating the board is rotating the bytes of the id.
    #[inline(always)]
    pub fn rotate(&self, count: usize) -> State {
        State {
            id: self.id.rotate_left(8 * (count % 4) as u32),
            ..*self
        }
    }

    /// Picks the rotation with the largest id as representative.
    ///
    /// Returns the representative and the number of quarter turns producing it.
    /// A rotation only wins if it is strictly larger than everything before it,
    /// so symmetric positions prefer the fewest turns.
    #[inline]
    pub fn canonicalize(&self) -> (State, usize) {
        let mut best = *self;
        let mut rotation = 0;
        for count in 1..4 {
            let rotated = self.rotate(count);
            if rotated.id > best.id {
                best = rotated;
                rotation = count;
            }
        }
        (best, rotation)
    }

    /// Swaps pegs and holes.
    ///
    /// Playing backwards from the goal is playing forwards on the complement,
    /// which is what lets both halves of the search share one hash table.
    #[inline(always)]
    pub fn complement(&self) -> State {
        State {
            id: !self.id,
            slack: !self.slack,
            pins: BOARD - self.pins,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{RngExt, SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::layout::position;

    fn random_state(prng: &mut SmallRng) -> State {
        State::new(prng.random(), prng.random())
    }

    #[test]
    fn start_and_goal_are_consistent() {
        assert!(State::START.is_consistent());
        assert!(State::GOAL.is_consistent());
        assert_eq!(State::new(u32::MAX, false), State::START);
        assert_eq!(State::START.complement(), State::GOAL);
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let mut prng = SmallRng::seed_from_u64(33);
        for _ in 0..10_000 {
            let state = random_state(&mut prng);
            let turned = state.rotate(1).rotate(1).rotate(1).rotate(1);
            assert_eq!(turned, state);
            assert_eq!(state.rotate(4), state);
        }
    }

    #[test]
    fn canonicalize_ignores_rotation() {
        let mut prng = SmallRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let state = random_state(&mut prng);
            let (canonical, rotation) = state.canonicalize();
            assert_eq!(state.rotate(rotation), canonical);
            for count in 0..4 {
                assert_eq!(state.rotate(count).canonicalize().0, canonical);
            }
        }
    }

    #[test]
    fn symmetric_positions_keep_identity() {
        assert_eq!(State::START.canonicalize(), (State::START, 0));
        assert_eq!(State::GOAL.canonicalize(), (State::GOAL, 0));
        // half turn symmetric: turns 1 and 3 tie, the first one wins
        let state = State::new(0x0102_0102, false);
        assert_eq!(state.canonicalize(), (State::new(0x0201_0201, false), 1));
        assert_eq!(state.rotate(1).canonicalize().1, 0);
    }

    #[test]
    fn rotation_moves_pegs_physically() {
        for hole in 0..SLACK {
            let state = State::new(1 << hole, true);
            let turned = state.rotate(1);
            let (y, x) = position(hole);
            let target = hole_at((x, SIZE - 1 - y)).unwrap();
            assert!(turned.occupied(target));
            assert!(turned.occupied(SLACK));
            assert_eq!(turned.pins, 2);
        }
    }

    #[test]
    fn complement_is_involution() {
        let mut prng = SmallRng::seed_from_u64(1996);
        for _ in 0..1000 {
            let state = random_state(&mut prng);
            let complement = state.complement();
            assert!(complement.is_consistent());
            assert_eq!(complement.complement(), state);
        }
    }

    #[test]
    fn vacant_holes_in_search_order() {
        assert_eq!(State::START.vacant_holes().collect::<Vec<_>>(), [SLACK]);
        let state = State::new(!0b1001, true);
        assert_eq!(state.vacant_holes().collect::<Vec<_>>(), [0, 3]);
        assert_eq!(State::GOAL.vacant_holes().count(), 32);
    }

    #[test]
    fn display_start() {
        let expected = "    * * *\n\
                        \x20   * * *\n\
                        * * * * * * *\n\
                        * * * . * * *\n\
                        * * * * * * *\n\
                        \x20   * * *\n\
                        \x20   * * *\n";
        assert_eq!(State::START.to_string(), expected);
    }
}
