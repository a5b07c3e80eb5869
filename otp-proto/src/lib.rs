// File:    lib.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The main library crate for otp-proto, providing the OTP wire protocol, cipher, and service core.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # OTP Protocol Library
//!
//! This library provides the networked one-time pad protocol: the restricted
//! 27-symbol alphabet, the mod-27 substitution cipher, the sentinel-delimited
//! message framing, the client-identity handshake, and the daemon/client
//! drivers that compose them over TCP.

/// The restricted 27-symbol alphabet and input validation.
pub mod alphabet;
/// The client driver: validate, connect, handshake, exchange.
pub mod client;
/// The mod-27 substitution cipher transform.
pub mod cipher;
/// Protocol and service error types.
pub mod error;
/// Sentinel-delimited message framing over a byte stream.
pub mod framing;
/// The client-identity handshake and service roles.
pub mod handshake;
/// The listening daemon: accept loop, sessions, shutdown.
pub mod server;

pub use error::ProtoError;
