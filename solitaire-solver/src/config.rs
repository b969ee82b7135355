use crate::{
    error::ConfigError,
    layout::{BOARD, PINS},
};

/// Frontier depth and hash table size combinations known to fit all states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePreset {
    /// join at 21 pegs, about 12 MB of hash table
    #[default]
    Large,
    /// join at 22 pegs, about 3 MB of hash table
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// peg count at which the forward and backward halves meet
    pub pins_left: u8,
    /// hash table capacity
    pub prime_1: u32,
    /// modulus of the probe step
    pub prime_2: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::preset(TablePreset::default())
    }
}

impl From<TablePreset> for SearchConfig {
    fn from(preset: TablePreset) -> Self {
        Self::preset(preset)
    }
}

impl SearchConfig {
    /// the frontier has to lie above the middle of the game, below the start
    pub const FRONTIER: std::ops::RangeInclusive<u8> = (BOARD / 2 + 1)..=(PINS - 1);

    pub fn preset(preset: TablePreset) -> Self {
        match preset {
            TablePreset::Large => SearchConfig {
                pins_left: 21,
                prime_1: 1_499_683,
                prime_2: 1_499_681,
            },
            TablePreset::Small => SearchConfig {
                pins_left: 22,
                prime_1: 383_683,
                prime_2: 383_681,
            },
        }
    }

    /// peg count where the phase 2 traversal stops
    pub fn trailing_pins(&self) -> u8 {
        BOARD - self.pins_left
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::FRONTIER.contains(&self.pins_left) {
            return Err(ConfigError::Frontier(self.pins_left));
        }
        for prime in [self.prime_1, self.prime_2] {
            if !is_prime(prime) {
                return Err(ConfigError::NotPrime(prime));
            }
        }
        if self.prime_2 >= self.prime_1 {
            return Err(ConfigError::ProbeStep {
                prime_1: self.prime_1,
                prime_2: self.prime_2,
            });
        }
        Ok(())
    }
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let n = n as u64;
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
        assert_eq!(SearchConfig::preset(TablePreset::Small).validate(), Ok(()));
        assert_eq!(SearchConfig::default().trailing_pins(), 12);
        assert_eq!(SearchConfig::FRONTIER, 17..=31);
    }

    #[test]
    fn rejects_frontier_outside_range() {
        for pins_left in [0, 16, 32, 33] {
            let config = SearchConfig {
                pins_left,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::Frontier(pins_left)));
        }
    }

    #[test]
    fn rejects_bad_primes() {
        let config = SearchConfig {
            prime_1: 1_499_685,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NotPrime(1_499_685)));

        let config = SearchConfig {
            prime_1: 383_681,
            prime_2: 383_683,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbeStep {
                prime_1: 383_681,
                prime_2: 383_683
            })
        );
    }

    #[test]
    fn primality() {
        let primes = (0..50).filter(|&n| is_prime(n)).collect::<Vec<_>>();
        assert_eq!(primes, [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]);
        assert!(is_prime(u32::MAX - 4));
    }
}
