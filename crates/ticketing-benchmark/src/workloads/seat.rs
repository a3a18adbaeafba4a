// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ConfigurationError;

/// Seats seeded by the contract's `InitLedger`.
pub const DEFAULT_SEATS: [&str; 3] = ["RAIL-A1", "BUS-101", "AIR-F1"];

/// Random suffix of unique seat labels is drawn from `[0, UNIQUE_SEAT_SUFFIX_RANGE)`.
pub const UNIQUE_SEAT_SUFFIX_RANGE: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatSelectionPolicy {
    /// Pick uniformly, with replacement, from a fixed list. Selling the same
    /// seat twice is left for the contract to reject.
    Fixed(Vec<String>),
    /// Synthesize `SEAT_{worker}_{millis}_{suffix}`. Two labels only collide
    /// when both the millisecond and the random suffix coincide.
    Unique,
}

impl Default for SeatSelectionPolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SEATS.iter().map(|s| s.to_string()).collect())
    }
}

impl SeatSelectionPolicy {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            SeatSelectionPolicy::Fixed(seats) if seats.is_empty() => {
                Err(ConfigurationError::EmptySeatSet)
            }
            _ => Ok(()),
        }
    }

    pub fn select_seat<R: Rng + ?Sized>(
        &self,
        worker_index: u64,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> Result<String, ConfigurationError> {
        match self {
            SeatSelectionPolicy::Fixed(seats) => {
                if seats.is_empty() {
                    return Err(ConfigurationError::EmptySeatSet);
                }
                Ok(seats[rng.gen_range(0..seats.len())].clone())
            }
            SeatSelectionPolicy::Unique => {
                let suffix = rng.gen_range(0..UNIQUE_SEAT_SUFFIX_RANGE);
                Ok(format!(
                    "SEAT_{}_{}_{}",
                    worker_index,
                    clock.now_millis(),
                    suffix
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_fixed_selection_is_roughly_uniform() {
        let policy = SeatSelectionPolicy::default();
        let clock = ManualClock::new(0);
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 3_000;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            let seat = policy.select_seat(0, &clock, &mut rng).unwrap();
            *counts.entry(seat).or_default() += 1;
        }
        assert_eq!(counts.len(), DEFAULT_SEATS.len());
        for seat in DEFAULT_SEATS {
            let freq = counts[seat] as f64 / draws as f64;
            assert!(
                (freq - 1.0 / 3.0).abs() < 0.05,
                "seat {seat} drawn with frequency {freq}"
            );
        }
    }

    #[test]
    fn test_empty_fixed_set_fails_fast() {
        let policy = SeatSelectionPolicy::Fixed(vec![]);
        let clock = ManualClock::new(0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(policy.validate(), Err(ConfigurationError::EmptySeatSet));
        assert_eq!(
            policy.select_seat(0, &clock, &mut rng),
            Err(ConfigurationError::EmptySeatSet)
        );
    }

    #[test]
    fn test_unique_seat_format() {
        let clock = ManualClock::new(1_700_000_000_123);
        let mut rng = StdRng::seed_from_u64(1);
        let seat = SeatSelectionPolicy::Unique
            .select_seat(5, &clock, &mut rng)
            .unwrap();
        let parts: Vec<&str> = seat.split('_').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "SEAT");
        assert_eq!(parts[1], "5");
        assert_eq!(parts[2], "1700000000123");
        assert!(parts[3].parse::<u32>().unwrap() < UNIQUE_SEAT_SUFFIX_RANGE);
    }

    #[test]
    fn test_unique_seats_differ_across_milliseconds() {
        let clock = ManualClock::new(1_000);
        let mut rng = StdRng::seed_from_u64(3);
        let first = SeatSelectionPolicy::Unique
            .select_seat(0, &clock, &mut rng)
            .unwrap();
        clock.advance(1);
        let second = SeatSelectionPolicy::Unique
            .select_seat(0, &clock, &mut rng)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_policy_from_yaml() {
        let policy: SeatSelectionPolicy =
            serde_yaml::from_str("fixed:\n  - RAIL-A1\n  - BUS-101\n").unwrap();
        assert_eq!(
            policy,
            SeatSelectionPolicy::Fixed(vec!["RAIL-A1".to_string(), "BUS-101".to_string()])
        );
        let policy: SeatSelectionPolicy = serde_yaml::from_str("unique").unwrap();
        assert_eq!(policy, SeatSelectionPolicy::Unique);
    }

    proptest! {
        #[test]
        fn prop_fixed_selection_stays_in_set(
            seats in proptest::collection::vec("[A-Z]{3}-[0-9]{1,3}", 1..8),
            seed in any::<u64>(),
        ) {
            let policy = SeatSelectionPolicy::Fixed(seats.clone());
            let clock = ManualClock::new(0);
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..32 {
                let seat = policy.select_seat(0, &clock, &mut rng).unwrap();
                prop_assert!(seats.contains(&seat));
            }
        }
    }
}
