mod config;
mod dir;
mod error;
mod hash;
mod jump;
pub mod layout;
mod search;
mod solution;
mod state;

pub use config::{SearchConfig, TablePreset};
pub use dir::Dir;
pub use error::{ConfigError, SearchError};
pub use hash::{HASH_HIST, HashStats, HashTable, Insertion, Lookup, Probe};
pub use jump::{Jump, Mask, MoveTable};
pub use layout::{BOARD, PINS, SLACK};
pub use search::{JoinPoint, Solver, solve};
pub use solution::{Solution, SolutionIter, SolutionRecorder};
pub use state::State;
