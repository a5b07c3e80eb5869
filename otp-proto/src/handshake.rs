// File:    handshake.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The client-identity handshake exchanged on every fresh connection, and the two service roles.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::cipher::Direction;
use crate::error::ProtoError;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reply byte the daemon sends when the client's identity matches its own.
pub const ACCEPT: u8 = b'1';

/// Reply byte the daemon sends when the identity does not match. The client
/// must treat any byte other than [`ACCEPT`] as a denial.
pub const DENY: u8 = b'0';

/// The handshake token is an ASCII decimal integer of at most four digits,
/// so a small fixed read buffer always holds it whole.
const TOKEN_BUF: usize = 8;

/// The two halves of the service. Each role fixes the identity token the
/// daemon expects and the direction the cipher runs for accepted sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The encryption service and its clients.
    Encrypt,
    /// The decryption service and its clients.
    Decrypt,
}

impl Role {
    /// The identity token clients of this role present.
    #[must_use]
    pub const fn token(self) -> u16 {
        match self {
            Self::Encrypt => 5512,
            Self::Decrypt => 2155,
        }
    }

    /// The cipher direction the daemon of this role applies.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Encrypt => Direction::Forward,
            Self::Decrypt => Direction::Inverse,
        }
    }

    /// Human-readable role name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// Client side: sends `token` as ASCII decimal and waits for the one-byte
/// verdict.
///
/// # Errors
///
/// Returns [`ProtoError::HandshakeDenied`] when the daemon replies with
/// anything other than the accept byte, [`ProtoError::ConnectionClosed`] when
/// the daemon closes without replying, and [`ProtoError::Io`] on socket
/// failure.
pub async fn perform<S>(stream: &mut S, token: u16) -> Result<(), ProtoError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(token.to_string().as_bytes()).await?;
    stream.flush().await?;

    let mut reply = [0u8; 1];
    let n = stream.read(&mut reply).await?;
    if n == 0 {
        return Err(ProtoError::ConnectionClosed);
    }
    if reply[0] != ACCEPT {
        return Err(ProtoError::HandshakeDenied);
    }
    Ok(())
}

/// Daemon side: reads the client's token, compares it against `expected`,
/// and replies with the accept or deny byte.
///
/// Returns whether the session was accepted. An unparseable token (empty,
/// non-numeric, oversized) is an ordinary denial, not an error.
///
/// # Errors
///
/// Returns [`ProtoError::ConnectionClosed`] when the client closes before
/// identifying itself, and [`ProtoError::Io`] on socket failure.
pub async fn verify<S>(stream: &mut S, expected: u16) -> Result<bool, ProtoError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; TOKEN_BUF];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Err(ProtoError::ConnectionClosed);
    }

    let presented = std::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|s| s.trim().parse::<u16>().ok());
    let accepted = presented == Some(expected);
    if !accepted {
        debug!("denying handshake: presented token {presented:?}, expected {expected}");
    }

    let verdict = if accepted { ACCEPT } else { DENY };
    stream.write_all(&[verdict]).await?;
    stream.flush().await?;
    Ok(accepted)
}
