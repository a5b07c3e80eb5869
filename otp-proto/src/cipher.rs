// File:    cipher.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The mod-27 substitution cipher applied symbol-by-symbol under a one-time key.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet::{self, ALPHABET_SIZE};
use crate::error::ProtoError;

/// Which way the substitution runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encryption: `(text + key) mod 27` per position.
    Forward,
    /// Decryption: `(text - key) mod 27` per position, normalized into
    /// `[0, 27)`.
    Inverse,
}

/// Applies the one-time pad substitution to `input` under `key`.
///
/// Each input symbol and the key symbol at the same position are mapped to
/// their codes (A-Z as 0-25, space as 26) and combined mod 27; the resulting
/// code maps back to a symbol. Positions are independent, so the transform is
/// pure and carries no state between them. Only the first `input.len()`
/// symbols of the key are consulted.
///
/// # Errors
///
/// Returns [`ProtoError::KeyTooShort`] when the key cannot cover the input,
/// and [`ProtoError::InvalidSymbol`] when either sequence contains a byte
/// outside the restricted alphabet.
pub fn transform(input: &[u8], key: &[u8], direction: Direction) -> Result<Vec<u8>, ProtoError> {
    if key.len() < input.len() {
        return Err(ProtoError::KeyTooShort {
            key_len: key.len(),
            text_len: input.len(),
        });
    }
    alphabet::validate(input)?;
    alphabet::validate(&key[..input.len()])?;

    let output = input
        .iter()
        .zip(key)
        .map(|(&t, &k)| {
            // validate() above guarantees both lookups succeed
            let ct = i16::from(alphabet::code_of(t).unwrap_or(0));
            let ck = i16::from(alphabet::code_of(k).unwrap_or(0));
            let combined = match direction {
                Direction::Forward => (ct + ck) % i16::from(ALPHABET_SIZE),
                Direction::Inverse => {
                    (ct - ck + i16::from(ALPHABET_SIZE)) % i16::from(ALPHABET_SIZE)
                }
            };
            // combined is always in [0, 27) here
            alphabet::symbol_of(combined as u8)
        })
        .collect();

    Ok(output)
}
