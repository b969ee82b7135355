use std::{
    fmt::{Display, Error, Formatter},
    ops::{BitOr, Index},
};

use crate::{
    Dir, State,
    layout::{self, BOARD, Hole, SLACK},
};

/// A set of holes, split like a [`State`] into the 32 bit id and the centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    pub id: u32,
    pub slack: bool,
}

impl Mask {
    pub fn hole(hole: Hole) -> Mask {
        if hole == SLACK {
            Mask {
                id: 0,
                slack: true,
            }
        } else {
            Mask {
                id: 1 << hole,
                slack: false,
            }
        }
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &Mask) -> bool {
        self.id & other.id != 0 || self.slack && other.slack
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        Mask {
            id: self.id | rhs.id,
            slack: self.slack | rhs.slack,
        }
    }
}

/// A jump into `landing`, coming from direction `dir`.
///
/// `next` holds the jumped peg and the jumping peg, `mask` additionally the
/// landing hole. Playing the jump flips `mask`, so playing it twice is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jump {
    pub allowed: bool,
    pub rank: usize,
    pub landing: Hole,
    pub dir: Dir,
    pub next: Mask,
    pub mask: Mask,
}

impl Jump {
    fn build(landing: Hole, dir: Dir) -> Jump {
        let rank = 4 * landing + dir as usize;
        let (over, origin) = dir.steps(layout::position(landing));
        match (layout::hole_at(over), layout::hole_at(origin)) {
            (Some(over), Some(origin)) => {
                let next = Mask::hole(over) | Mask::hole(origin);
                Jump {
                    allowed: true,
                    rank,
                    landing,
                    dir,
                    next,
                    mask: next | Mask::hole(landing),
                }
            }
            _ => Jump {
                allowed: false,
                rank,
                landing,
                dir,
                next: Mask::default(),
                mask: Mask::default(),
            },
        }
    }

    /// jumped and jumping pegs present, landing hole empty
    #[inline(always)]
    pub fn is_legal(&self, state: &State) -> bool {
        self.allowed && !state.occupied(self.landing) && state.contains(self.next)
    }

    /// the hole the jumping peg starts from
    pub fn origin(&self) -> Option<Hole> {
        let (_, origin) = self.dir.steps(layout::position(self.landing));
        self.allowed.then(|| layout::hole_at(origin)).flatten()
    }
}

impl Display for Jump {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let (_, origin) = self.dir.steps(layout::position(self.landing));
        write!(f, "{}{}{}", origin.0, origin.1, self.dir.opposite())?;
        Ok(())
    }
}

/// Every jump of the board, four per landing hole, indexed by rank.
#[derive(Clone, Debug)]
pub struct MoveTable {
    jumps: [Jump; MoveTable::LEN],
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveTable {
    type Output = Jump;

    fn index(&self, rank: usize) -> &Jump {
        &self.jumps[rank]
    }
}

impl MoveTable {
    pub const LEN: usize = 4 * BOARD as usize;

    pub fn new() -> Self {
        let jumps = std::array::from_fn(|rank| Jump::build(rank / 4, Dir::ALL[rank % 4]));
        MoveTable { jumps }
    }

    /// the four jumps landing in `landing`, in direction order
    #[inline(always)]
    pub fn jumps_into(&self, landing: Hole) -> &[Jump] {
        &self.jumps[4 * landing..4 * landing + 4]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Jump> {
        self.jumps.iter()
    }

    pub fn allowed(&self) -> impl Iterator<Item = &Jump> {
        self.iter().filter(|jump| jump.allowed)
    }

    /// the jump taking `before` to `after`, if there is one
    pub fn find_jump(&self, before: &State, after: &State) -> Option<&Jump> {
        if before.pins != after.pins + 1 {
            return None;
        }
        self.allowed()
            .find(|jump| jump.is_legal(before) && before.apply(jump.mask) == *after)
    }
}

#[cfg(test)]
mod tests {
    use rand::{RngExt, SeedableRng, rngs::SmallRng};

    use super::*;

    #[test]
    fn table_size() {
        let table = MoveTable::new();
        assert_eq!(table.iter().count(), 132);
        // 76 jumps fit on the cross
        assert_eq!(table.allowed().count(), 76);
        for (index, jump) in table.iter().enumerate() {
            assert_eq!(jump.rank, index);
            assert_eq!(table[index], *jump);
        }
    }

    #[test]
    fn masks_touch_three_holes() {
        let table = MoveTable::new();
        for jump in table.allowed() {
            let holes = jump.mask.id.count_ones() + jump.mask.slack as u32;
            assert_eq!(holes, 3);
            assert!(!jump.next.overlaps(&Mask::hole(jump.landing)));
            assert!(jump.mask.overlaps(&Mask::hole(jump.origin().unwrap())));
        }
    }

    #[test]
    fn start_has_four_jumps() {
        let table = MoveTable::new();
        let legal = table
            .allowed()
            .filter(|jump| jump.is_legal(&State::START))
            .collect::<Vec<_>>();
        assert_eq!(legal.len(), 4);
        assert!(legal.iter().all(|jump| jump.landing == SLACK));
        assert_eq!(legal[0].to_string(), "13v");
    }

    #[test]
    fn jumps_are_involutions() {
        let table = MoveTable::new();
        let mut prng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let state = State::new(prng.random(), prng.random());
            for jump in table.allowed() {
                let once = State {
                    id: state.id ^ jump.mask.id,
                    slack: state.slack ^ jump.mask.slack,
                    ..state
                };
                let twice = State {
                    id: once.id ^ jump.mask.id,
                    slack: once.slack ^ jump.mask.slack,
                    ..once
                };
                assert_eq!(twice, state);
            }
        }
    }

    #[test]
    fn legal_jumps_keep_peg_count() {
        let table = MoveTable::new();
        let mut prng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let state = State::new(prng.random(), prng.random());
            if state.pins < 2 {
                continue;
            }
            for jump in table.allowed().filter(|jump| jump.is_legal(&state)) {
                let next = state.apply(jump.mask);
                assert!(next.is_consistent());
                assert!(next.occupied(jump.landing));
                assert_eq!(table.find_jump(&state, &next), Some(jump));
            }
        }
    }

    #[test]
    fn no_jump_between_unrelated_states() {
        let table = MoveTable::new();
        assert_eq!(table.find_jump(&State::START, &State::GOAL), None);
        assert_eq!(table.find_jump(&State::START, &State::START), None);
    }
}
