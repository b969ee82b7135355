//! Hole numbering of the cross board.
//!
//! A quarter turn clockwise maps hole `n` to hole `(n + 8) % 32`, so each arm
//! of the cross (together with the two inner holes next to it) fills exactly
//! one byte of a [`State`](crate::State) id. [`State::rotate`](crate::State::rotate)
//! depends on this, holes must never be renumbered without it.
//!
//! ```text
//!          0  1  2
//!          3  4  5
//!  26 29   6  7 14 11  8
//!  25 28  31  C 15 12  9
//!  24 27  30 23 22 13 10
//!         21 20 19
//!         18 17 16
//! ```
//!
//! `C` is the centre, the slack hole.

pub type Idx = i64;
pub type Hole = usize;

/// number of holes
pub const BOARD: u8 = 33;
/// number of pegs in the start position
pub const PINS: u8 = 32;
/// the centre hole, kept outside of the 32 bit id
pub const SLACK: Hole = PINS as Hole;
/// width and height of the board
pub const SIZE: Idx = 7;

const X: u8 = u8::MAX;
const C: u8 = SLACK as u8;

#[rustfmt::skip]
const LAYOUT: [[u8; SIZE as usize]; SIZE as usize] = [
    [ X,  X,  0,  1,  2,  X,  X],
    [ X,  X,  3,  4,  5,  X,  X],
    [26, 29,  6,  7, 14, 11,  8],
    [25, 28, 31,  C, 15, 12,  9],
    [24, 27, 30, 23, 22, 13, 10],
    [ X,  X, 21, 20, 19,  X,  X],
    [ X,  X, 18, 17, 16,  X,  X],
];

const POSITIONS: [(Idx, Idx); BOARD as usize] = {
    let mut positions = [(0, 0); BOARD as usize];
    let mut y = 0;
    while y < SIZE as usize {
        let mut x = 0;
        while x < SIZE as usize {
            let hole = LAYOUT[y][x];
            if hole != X {
                positions[hole as usize] = (y as Idx, x as Idx);
            }
            x += 1;
        }
        y += 1;
    }
    positions
};

#[inline(always)]
pub fn inbounds(pos: (Idx, Idx)) -> bool {
    let (y, x) = pos;
    in_mid_section(x) && in_whole_range(y) || in_mid_section(y) && in_whole_range(x)
}

pub fn hole_at(pos: (Idx, Idx)) -> Option<Hole> {
    if !inbounds(pos) {
        return None;
    }
    let (y, x) = pos;
    Some(LAYOUT[y as usize][x as usize] as Hole)
}

/// (row, column) of a hole
pub fn position(hole: Hole) -> (Idx, Idx) {
    POSITIONS[hole]
}

#[inline(always)]
fn in_mid_section(i: Idx) -> bool {
    (2..5).contains(&i)
}

#[inline(always)]
fn in_whole_range(i: Idx) -> bool {
    (0..SIZE).contains(&i)
}
