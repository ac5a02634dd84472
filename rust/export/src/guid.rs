// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic IFC GlobalIds
//!
//! A GlobalId is 128 bits written as 22 characters of the IFC base-64
//! alphabet. Here the bits are the first 16 bytes of a SHA-256 over a scope
//! and a name, so the same model always gets the same ids.

use sha2::{Digest, Sha256};

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// GlobalId for `name` within `scope` (e.g. `"member"`, `"pset"`).
pub fn global_id(scope: &str, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(scope.as_bytes());
    hasher.update([0u8]);
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    compress(u128::from_be_bytes(bytes))
}

/// 2 bits in the first character, 6 bits in each of the other 21.
fn compress(value: u128) -> String {
    let mut out = String::with_capacity(22);
    out.push(ALPHABET[(value >> 126) as usize & 0x3] as char);
    for i in (0..21).rev() {
        out.push(ALPHABET[(value >> (6 * i)) as usize & 0x3f] as char);
    }
    out
}
