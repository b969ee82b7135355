use thiserror::Error;

use crate::hash::HashStats;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The table is too small for the states above the frontier.
    #[error("hash table full after storing {} states", .stats.len())]
    TableFull { stats: Box<HashStats> },
    #[error("no frontier state reaches the trailing frontier")]
    NoJoin,
    #[error("frontier states of the join were not reached again")]
    Unlocated,
    #[error("solution misses the board with {pins} pegs")]
    Incomplete { pins: u8 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frontier of {0} pegs outside of 17..=31")]
    Frontier(u8),
    #[error("{0} is not prime")]
    NotPrime(u32),
    #[error("probe modulus {prime_2} must be smaller than the table size {prime_1}")]
    ProbeStep { prime_1: u32, prime_2: u32 },
}
