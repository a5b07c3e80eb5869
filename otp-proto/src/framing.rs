// File:    framing.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: Sentinel-delimited message framing over a connected byte stream.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet::SENTINEL;
use crate::error::ProtoError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Writes `payload` followed by the sentinel terminator to `stream`.
///
/// `write_all` loops internally until every byte is accepted, so partial
/// writes are accounted for.
///
/// # Errors
///
/// Returns [`ProtoError::Io`] when the underlying write or flush fails.
pub async fn send_framed<W>(stream: &mut W, payload: &[u8]) -> Result<(), ProtoError>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(payload).await?;
    stream.write_all(&[SENTINEL]).await?;
    stream.flush().await?;
    Ok(())
}

/// Reads one framed message from `stream`, returning the payload without its
/// sentinel terminator.
///
/// Bytes accumulate into a growable buffer until the sentinel is observed,
/// so there is no upper bound on message size baked into the implementation.
/// The stream must be buffered: consecutive frames routinely coalesce into
/// one TCP segment, and the reader's buffer is what carries the surplus
/// bytes over to the next call instead of losing them. Callers wrap each
/// session stream in a [`tokio::io::BufReader`] once and read every frame
/// through it.
///
/// # Errors
///
/// Returns [`ProtoError::ConnectionClosed`] when the peer closes the stream
/// before the sentinel arrives, and [`ProtoError::Io`] on read failure.
pub async fn recv_framed<R>(stream: &mut R) -> Result<Vec<u8>, ProtoError>
where
    R: AsyncBufRead + Unpin,
{
    let mut payload = Vec::new();
    let n = stream.read_until(SENTINEL, &mut payload).await?;
    if n == 0 {
        return Err(ProtoError::ConnectionClosed);
    }
    // read_until also returns on EOF; only a sentinel-terminated buffer is a
    // complete message.
    if payload.last() != Some(&SENTINEL) {
        return Err(ProtoError::ConnectionClosed);
    }
    payload.pop();
    Ok(payload)
}
