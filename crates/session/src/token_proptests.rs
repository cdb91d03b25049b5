// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property-based tests for the session-token round-trip invariant (§8
//! "Token round trip"): a freshly issued token always validates back to the
//! record it was issued from, and any tampering invalidates it.

use proptest::prelude::*;

use super::*;
use mf_core::FakeClock;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,12}"
}

fn address_strategy() -> impl Strategy<Value = String> {
    (1u8..=254, 1u8..=254, 1u8..=254, 1u8..=254).prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}:4000"))
}

proptest! {
    /// A token created for a given name/connection/address validates back
    /// to a record carrying exactly those fields, unexpired.
    #[test]
    fn created_token_round_trips(name in name_strategy(), address in address_strategy()) {
        let clock = FakeClock::new();
        let connection_id = ConnectionId::new();
        let manager = SessionManager::new(b"test-secret".to_vec(), 60_000, true, clock);

        let issued = manager.create_token(&name, connection_id, &address);
        let record = manager.validate(&issued.token, Some(&address)).unwrap();

        prop_assert_eq!(record.name, name.to_lowercase());
        prop_assert_eq!(record.connection_id, connection_id);
        prop_assert_eq!(record.address, address);
    }

    /// Flipping any single character of an issued token invalidates it:
    /// either the signature check or the payload decode must fail.
    #[test]
    fn tampering_with_the_token_invalidates_it(
        name in name_strategy(),
        address in address_strategy(),
        flip_index in 0usize..64,
    ) {
        let clock = FakeClock::new();
        let connection_id = ConnectionId::new();
        let manager = SessionManager::new(b"test-secret".to_vec(), 60_000, true, clock);

        let issued = manager.create_token(&name, connection_id, &address);
        let mut bytes = issued.token.into_bytes();
        if bytes.is_empty() {
            return Ok(());
        }
        let idx = flip_index % bytes.len();
        bytes[idx] ^= 0x01;
        let tampered = String::from_utf8_lossy(&bytes).into_owned();

        prop_assert!(manager.validate(&tampered, Some(&address)).is_err());
    }

    /// A token presented from a different address than it was issued for
    /// is rejected when IP binding is enabled.
    #[test]
    fn address_mismatch_is_rejected_when_bound(
        name in name_strategy(),
        address in address_strategy(),
        other_address in address_strategy(),
    ) {
        prop_assume!(address != other_address);
        let clock = FakeClock::new();
        let connection_id = ConnectionId::new();
        let manager = SessionManager::new(b"test-secret".to_vec(), 60_000, true, clock);

        let issued = manager.create_token(&name, connection_id, &address);
        prop_assert!(manager.validate(&issued.token, Some(&other_address)).is_err());
    }
}
