use std::fmt::{Display, Error, Formatter};

use crate::layout::Idx;

/// Directions in move table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    North,
    East,
    South,
    West,
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Dir::North => write!(f, "^"),
            Dir::East => write!(f, ">"),
            Dir::South => write!(f, "v"),
            Dir::West => write!(f, "<"),
        }
    }
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    /// the positions one and two steps away from `pos`
    pub(crate) fn steps(&self, pos: (Idx, Idx)) -> ((Idx, Idx), (Idx, Idx)) {
        let (y, x) = pos;
        match self {
            Dir::North => ((y - 1, x), (y - 2, x)),
            Dir::East => ((y, x + 1), (y, x + 2)),
            Dir::South => ((y + 1, x), (y + 2, x)),
            Dir::West => ((y, x - 1), (y, x - 2)),
        }
    }

    pub fn opposite(&self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }
}
