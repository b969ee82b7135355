use std::fmt::{Display, Formatter};

use log::info;

use crate::State;

/// number of probe depths tracked individually by [`HashStats`]
pub const HASH_HIST: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    Duplicate,
    /// every slot probed, none free or matching
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found,
    NotFound,
}

/// Probe depth histogram and fill level of a [`HashTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashStats {
    capacity: usize,
    added: [u64; HASH_HIST],
    added_overflow: u64,
    matched: [u64; HASH_HIST],
    matched_overflow: u64,
    total: usize,
    percent: usize,
    check_point: usize,
}

impl HashStats {
    fn new(capacity: usize) -> Self {
        HashStats {
            capacity,
            added: [0; HASH_HIST],
            added_overflow: 0,
            matched: [0; HASH_HIST],
            matched_overflow: 0,
            total: 0,
            percent: 10,
            check_point: capacity / 10,
        }
    }

    fn record_insert(&mut self, probe: usize) {
        match self.added.get_mut(probe) {
            Some(count) => *count += 1,
            None => self.added_overflow += 1,
        }
        self.total += 1;
        if self.total > self.check_point {
            info!("hash table {}% full", self.load_percent());
            self.percent += 10;
            self.check_point = self.capacity * self.percent / 100;
        }
    }

    fn record_match(&mut self, probe: usize) {
        match self.matched.get_mut(probe) {
            Some(count) => *count += 1,
            None => self.matched_overflow += 1,
        }
    }

    /// number of stored states
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// a table without slots counts as full
    pub fn load_percent(&self) -> usize {
        (self.total * 100).checked_div(self.capacity).unwrap_or(100)
    }

    /// insertions that found their slot after `probe` collisions, the last bucket counts the rest
    pub fn added(&self) -> impl Iterator<Item = u64> {
        self.added.iter().copied().chain([self.added_overflow])
    }

    /// duplicates detected after `probe` collisions, the last bucket counts the rest
    pub fn matched(&self) -> impl Iterator<Item = u64> {
        self.matched.iter().copied().chain([self.matched_overflow])
    }
}

impl Display for HashStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for depth in 0..HASH_HIST {
            writeln!(
                f,
                "depth {depth:2} : added {:9}, match {:9}",
                self.added[depth], self.matched[depth]
            )?;
        }
        writeln!(
            f,
            "depth {HASH_HIST:2}+: added {:9}, match {:9}",
            self.added_overflow, self.matched_overflow
        )?;
        writeln!(f, "hash table {}% full", self.load_percent())
    }
}

/// Double hashing probe sequence over `capacity` slots.
///
/// Starts at `id % prime_1` and steps by `1 + id % prime_2`. The step is never
/// a multiple of the prime capacity, so all slots are visited exactly once.
#[derive(Debug, Clone)]
pub struct Probe {
    slot: u64,
    step: u64,
    capacity: u64,
    remaining: u64,
}

impl Iterator for Probe {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.slot;
        self.slot = (self.slot + self.step) % self.capacity;
        self.remaining -= 1;
        Some(slot as usize)
    }
}

/// Fixed capacity open addressing set of canonical states.
///
/// Vacant slots hold a state without pegs, which no reachable state can be.
#[derive(Debug, Clone)]
pub struct HashTable {
    slots: Box<[State]>,
    prime_1: u32,
    prime_2: u32,
    stats: HashStats,
}

impl HashTable {
    /// `prime_1` is the capacity. Both must be prime with `prime_2 < prime_1`
    /// for probes to reach every slot, see [`SearchConfig::validate`](crate::SearchConfig::validate).
    /// A table of capacity 0 is always full.
    pub fn new(prime_1: u32, prime_2: u32) -> Self {
        let capacity = prime_1 as usize;
        HashTable {
            slots: vec![State::default(); capacity].into_boxed_slice(),
            prime_1,
            prime_2,
            stats: HashStats::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn stats(&self) -> &HashStats {
        &self.stats
    }

    pub fn clear(&mut self) {
        self.slots.fill(State::default());
        self.stats = HashStats::new(self.capacity());
    }

    #[inline(always)]
    pub fn probe(&self, id: u32) -> Probe {
        Probe {
            slot: id.checked_rem(self.prime_1).unwrap_or(0) as u64,
            step: 1 + id.checked_rem(self.prime_2).unwrap_or(0) as u64,
            capacity: self.prime_1 as u64,
            remaining: self.prime_1 as u64,
        }
    }

    /// Stores the canonical form of `state`.
    pub fn insert(&mut self, state: &State) -> Insertion {
        debug_assert!(state.pins > 0);
        let (canonical, _) = state.canonicalize();
        for (probe, slot) in self.probe(canonical.id).enumerate() {
            let entry = &mut self.slots[slot];
            if is_vacant(entry) {
                *entry = canonical;
                self.stats.record_insert(probe);
                return Insertion::Inserted;
            }
            if entry.same_position(&canonical) {
                self.stats.record_match(probe);
                return Insertion::Duplicate;
            }
        }
        self.stats.matched_overflow += 1;
        Insertion::Full
    }

    pub fn lookup(&self, state: &State) -> Lookup {
        let (canonical, _) = state.canonicalize();
        for slot in self.probe(canonical.id) {
            let entry = &self.slots[slot];
            if is_vacant(entry) {
                break;
            }
            if entry.same_position(&canonical) {
                return Lookup::Found;
            }
        }
        Lookup::NotFound
    }

    /// stored states in slot order
    pub fn slots(&self) -> &[State] {
        &self.slots
    }

    /// stored states with `pins` pegs, in slot order
    pub fn frontier(&self, pins: u8) -> impl Iterator<Item = &State> {
        self.slots.iter().filter(move |entry| entry.pins == pins)
    }
}

#[inline(always)]
fn is_vacant(entry: &State) -> bool {
    entry.pins == 0
}
