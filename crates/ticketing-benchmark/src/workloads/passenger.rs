// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use rand::Rng;

/// Passenger ids of throwaway registrations are drawn from `[0, EPHEMERAL_ID_RANGE)`.
pub const EPHEMERAL_ID_RANGE: u32 = 100_000;
pub const EPHEMERAL_NAME_RANGE: u32 = 1_000;

const WORKER_CONTACT: &str = "worker@example.com";
const EPHEMERAL_CONTACT: &str = "user@example.com";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PassengerIdentity {
    pub id: String,
    pub display_name: String,
    pub contact: String,
}

impl PassengerIdentity {
    /// The passenger a worker registers once and then buys every ticket for.
    /// Embedding the worker index keeps identities of different workers apart.
    pub fn for_worker(worker_index: u64, now_millis: u64) -> Self {
        Self {
            id: format!("Passenger_Worker{worker_index}_{now_millis}"),
            display_name: format!("Worker{worker_index}"),
            contact: WORKER_CONTACT.to_string(),
        }
    }

    /// A one-shot passenger for registration-only workloads. Not unique.
    pub fn ephemeral<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = rng.gen_range(0..EPHEMERAL_ID_RANGE);
        let name = rng.gen_range(0..EPHEMERAL_NAME_RANGE);
        Self {
            id: format!("Passenger_{id}"),
            display_name: format!("User{name}"),
            contact: EPHEMERAL_CONTACT.to_string(),
        }
    }

    /// Arguments of `RegisterPassenger`, in contract order.
    pub fn registration_arguments(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.display_name.clone(),
            self.contact.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_worker_passenger_format() {
        let passenger = PassengerIdentity::for_worker(3, 1_700_000_000_000);
        assert_eq!(passenger.id, "Passenger_Worker3_1700000000000");
        assert_eq!(passenger.display_name, "Worker3");
        assert_eq!(passenger.contact, "worker@example.com");
        assert_eq!(
            passenger.registration_arguments(),
            vec![
                "Passenger_Worker3_1700000000000",
                "Worker3",
                "worker@example.com"
            ]
        );
    }

    #[test]
    fn test_ephemeral_passenger_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let passenger = PassengerIdentity::ephemeral(&mut rng);
            let id: u32 = passenger
                .id
                .strip_prefix("Passenger_")
                .unwrap()
                .parse()
                .unwrap();
            let name: u32 = passenger
                .display_name
                .strip_prefix("User")
                .unwrap()
                .parse()
                .unwrap();
            assert!(id < EPHEMERAL_ID_RANGE);
            assert!(name < EPHEMERAL_NAME_RANGE);
            assert_eq!(passenger.contact, "user@example.com");
        }
    }

    proptest! {
        // Millisecond timestamps between 2001 and 2286 all have 13 digits.
        #[test]
        fn prop_worker_passengers_never_collide(
            a in 0u64..100_000,
            b in 0u64..100_000,
            ts_a in 1_000_000_000_000u64..10_000_000_000_000,
            ts_b in 1_000_000_000_000u64..10_000_000_000_000,
        ) {
            prop_assume!(a != b);
            let pa = PassengerIdentity::for_worker(a, ts_a);
            let pb = PassengerIdentity::for_worker(b, ts_b);
            prop_assert_ne!(pa.id, pb.id);
            prop_assert_ne!(pa.display_name, pb.display_name);
        }
    }
}
