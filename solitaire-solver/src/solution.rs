use std::fmt::{Display, Formatter, Result};

use crate::{
    Jump, MoveTable, SearchError, State,
    layout::{BOARD, PINS},
};

/// Collects the boards of a solution from the three search phases, keyed by peg count.
#[derive(Clone, Debug)]
pub struct SolutionRecorder {
    states: [Option<State>; BOARD as usize + 1],
}

impl Default for SolutionRecorder {
    fn default() -> Self {
        SolutionRecorder {
            states: [None; BOARD as usize + 1],
        }
    }
}

impl SolutionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boards claiming more pegs than there are holes are ignored.
    pub fn record(&mut self, state: State) {
        let Some(slot) = self.states.get_mut(state.pins as usize) else {
            return;
        };
        debug_assert!(slot.is_none_or(|s| s.same_position(&state)));
        *slot = Some(state);
    }

    pub fn contains(&self, pins: u8) -> bool {
        self.states
            .get(pins as usize)
            .is_some_and(|state| state.is_some())
    }

    /// Adds start and goal and orders the boards from 32 pegs down to one.
    pub fn finish(mut self) -> std::result::Result<Solution, SearchError> {
        self.record(State::START);
        self.record(State::GOAL);
        let mut steps = [State::default(); PINS as usize];
        for (step, pins) in steps.iter_mut().zip((1..=PINS).rev()) {
            *step = self.states[pins as usize].ok_or(SearchError::Incomplete { pins })?;
        }
        Ok(Solution { steps })
    }
}

impl Extend<State> for SolutionRecorder {
    fn extend<T: IntoIterator<Item = State>>(&mut self, iter: T) {
        for state in iter {
            self.record(state);
        }
    }
}

/// The boards from start to goal, one peg fewer each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solution {
    steps: [State; PINS as usize],
}

impl Solution {
    pub fn states(&self) -> &[State] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> State {
        self.steps[0]
    }

    pub fn last(&self) -> State {
        self.steps[self.steps.len() - 1]
    }

    /// The jump between each pair of consecutive boards, `None` where there is none.
    pub fn jumps<'t>(&self, table: &'t MoveTable) -> impl Iterator<Item = Option<&'t Jump>> {
        let steps = self.steps;
        (1..steps.len()).map(move |i| table.find_jump(&steps[i - 1], &steps[i]))
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for state in self.steps {
            writeln!(f, "{state}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a State;

    type IntoIter = std::slice::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Solution {
    type Item = State;

    type IntoIter = SolutionIter;

    fn into_iter(self) -> Self::IntoIter {
        SolutionIter { sol: self, idx: 0 }
    }
}

pub struct SolutionIter {
    sol: Solution,
    idx: usize,
}

impl Iterator for SolutionIter {
    type Item = State;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.sol.steps.len() {
            let res = self.sol.steps[self.idx];
            self.idx += 1;
            Some(res)
        } else {
            None
        }
    }
}
