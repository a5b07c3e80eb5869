// File:    keygen.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: Generates random key material over the restricted alphabet.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use otp_proto::alphabet::{ALPHABET_SIZE, symbol_of};
use rand::Rng;

/// Generates `length` symbols sampled uniformly from the restricted
/// alphabet (A-Z and space).
pub(crate) fn generate_key(length: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| symbol_of(rng.random_range(0..ALPHABET_SIZE)))
        .collect()
}
