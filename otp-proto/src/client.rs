// File:    client.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The client driver: local validation, connect, handshake, framed exchange.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet;
use crate::error::ProtoError;
use crate::framing::{recv_framed, send_framed};
use crate::handshake::{self, Role};
use log::debug;
use tokio::io::BufReader;
use tokio::net::TcpStream;

/// Submits `text` and `key` to the daemon at `host:port` and returns the
/// transformed result.
///
/// Both inputs are validated against the restricted alphabet and the
/// key-covers-text precondition before any network I/O, so invalid local
/// input never reaches the wire.
///
/// # Errors
///
/// Returns [`ProtoError::InvalidSymbol`] or [`ProtoError::KeyTooShort`] on
/// local validation failure, [`ProtoError::Io`] when the connection cannot be
/// established or breaks, [`ProtoError::HandshakeDenied`] when the daemon at
/// the other end serves the opposite role, and [`ProtoError::ConnectionClosed`]
/// when the daemon closes mid-exchange (for example after rejecting the
/// payload server-side).
pub async fn run(
    host: &str,
    port: u16,
    role: Role,
    text: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, ProtoError> {
    alphabet::validate(text)?;
    alphabet::validate(key)?;
    if key.len() < text.len() {
        return Err(ProtoError::KeyTooShort {
            key_len: key.len(),
            text_len: text.len(),
        });
    }

    let stream = TcpStream::connect((host, port)).await?;
    debug!("connected to {host}:{port} as {} client", role.name());
    // Buffered for the framed reads; the daemon only sends one frame back,
    // but the reply must be read through the same carry-over buffer.
    let mut stream = BufReader::new(stream);

    handshake::perform(&mut stream, role.token()).await?;
    send_framed(&mut stream, text).await?;
    send_framed(&mut stream, key).await?;
    recv_framed(&mut stream).await
}
