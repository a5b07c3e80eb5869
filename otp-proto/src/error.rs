// File:    error.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: Error types covering validation, handshake, framing, and I/O failures.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use thiserror::Error;

/// Errors produced by the protocol library.
///
/// Client-side callers treat every variant as fatal; the daemon treats every
/// variant as session-local except the I/O errors raised while binding.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A byte outside the restricted alphabet (A-Z and space) was found.
    #[error("invalid symbol 0x{byte:02x} at position {position}: only A-Z and space are allowed")]
    InvalidSymbol {
        /// The offending byte value.
        byte: u8,
        /// Zero-based position of the offending byte.
        position: usize,
    },

    /// The key has fewer symbols than the text it must cover.
    #[error("key is too short: key has {key_len} symbols but the text has {text_len}")]
    KeyTooShort {
        /// Length of the supplied key in symbols.
        key_len: usize,
        /// Length of the text in symbols.
        text_len: usize,
    },

    /// The remote daemon refused the handshake; the client is talking to the
    /// wrong service.
    #[error("connection refused: the remote daemon does not accept this client's identity")]
    HandshakeDenied,

    /// The peer closed the connection before the message terminator arrived.
    #[error("connection closed by peer before the message terminator")]
    ConnectionClosed,

    /// The session exceeded its deadline while waiting on the peer.
    #[error("session timed out waiting on the peer")]
    SessionTimeout,

    /// An underlying socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
