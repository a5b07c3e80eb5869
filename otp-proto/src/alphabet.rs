// File:    alphabet.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The restricted 27-symbol alphabet (A-Z, space) and its integer code mapping.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::error::ProtoError;

/// Number of symbols in the restricted alphabet: the letters A-Z plus space.
pub const ALPHABET_SIZE: u8 = 27;

/// The code assigned to the space symbol. Letters take codes 0-25.
pub const SPACE_CODE: u8 = 26;

/// Terminator byte marking the end of a framed message.
///
/// Guaranteed absent from any validated payload, so it can never be confused
/// with content.
pub const SENTINEL: u8 = b'?';

/// Returns the integer code (0-26) for a symbol, or `None` if the byte is
/// outside the restricted alphabet.
#[must_use]
pub const fn code_of(symbol: u8) -> Option<u8> {
    match symbol {
        b'A'..=b'Z' => Some(symbol - b'A'),
        b' ' => Some(SPACE_CODE),
        _ => None,
    }
}

/// Returns the symbol for an integer code in `[0, 27)`.
///
/// # Panics
///
/// Panics in debug builds if `code` is out of range; callers only produce
/// codes through mod-27 arithmetic.
#[must_use]
pub const fn symbol_of(code: u8) -> u8 {
    debug_assert!(code < ALPHABET_SIZE);
    if code == SPACE_CODE { b' ' } else { b'A' + code }
}

/// Checks that every byte of `data` belongs to the restricted alphabet.
///
/// # Errors
///
/// Returns [`ProtoError::InvalidSymbol`] naming the first offending byte and
/// its position.
pub fn validate(data: &[u8]) -> Result<(), ProtoError> {
    match data.iter().position(|&b| code_of(b).is_none()) {
        Some(position) => Err(ProtoError::InvalidSymbol {
            byte: data[position],
            position,
        }),
        None => Ok(()),
    }
}
