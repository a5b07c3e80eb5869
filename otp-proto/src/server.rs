// File:    server.rs
// Author:  apezoo
// Date:    2025-08-22
//
// Description: The listening daemon core: accepts connections, runs one task per session, drains on shutdown.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::cipher;
use crate::error::ProtoError;
use crate::framing::{recv_framed, send_framed};
use crate::handshake::{self, Role};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Deadline for one whole session (handshake through result delivery). A
/// stalled peer must not pin a worker forever.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30);

/// One daemon instance: a bound listener plus the role it serves.
///
/// The listener is the only shared resource; sessions never touch it. Each
/// accepted connection is handed to its own task, which owns the stream
/// exclusively until it finishes.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    role: Role,
}

impl Server {
    /// Binds `0.0.0.0:port` for the given role.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Io`] when the port cannot be bound; callers
    /// treat this as fatal at startup.
    pub async fn bind(port: u16, role: Role) -> Result<Self, ProtoError> {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        Ok(Self { listener, role })
    }

    /// The address the daemon is actually listening on. Useful when bound to
    /// port 0.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Io`] if the local address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtoError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until `shutdown` is cancelled.
    ///
    /// Each accepted connection is spawned onto a [`JoinSet`]; completed
    /// sessions are reaped inside the same select loop so finished workers
    /// never accumulate. A session failure is logged and affects only that
    /// session. On shutdown the listener is released first, then in-flight
    /// sessions drain to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Io`] if the local address cannot be queried for
    /// the startup log line. Accept failures are logged and retried, not
    /// propagated.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ProtoError> {
        info!(
            "{} daemon listening on {}",
            self.role.name(),
            self.local_addr()?
        );

        let mut sessions: JoinSet<()> = JoinSet::new();
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let role = self.role;
                        sessions.spawn(async move {
                            match serve_session(stream, role).await {
                                Ok(true) => info!("session from {peer} completed"),
                                Ok(false) => {
                                    info!("session from {peer} denied: wrong client identity");
                                }
                                Err(e) => warn!("session from {peer} failed: {e}"),
                            }
                        });
                    }
                    Err(e) => warn!("failed to accept connection: {e}"),
                },
                Some(reaped) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = reaped {
                        error!("session worker terminated abnormally: {e}");
                    }
                }
            }
        }

        // Release the listening endpoint before draining so no new
        // connections are admitted while in-flight sessions finish.
        drop(self.listener);
        info!(
            "shutdown requested, draining {} in-flight session(s)",
            sessions.len()
        );
        while let Some(reaped) = sessions.join_next().await {
            if let Err(e) = reaped {
                error!("session worker terminated abnormally: {e}");
            }
        }
        info!("{} daemon stopped", self.role.name());
        Ok(())
    }
}

/// Runs one session under the session deadline. Returns whether the
/// handshake was accepted.
async fn serve_session(stream: TcpStream, role: Role) -> Result<bool, ProtoError> {
    // Buffered so consecutive frames coalescing into one segment carry over
    // to the next framed read instead of being lost.
    let mut stream = BufReader::new(stream);
    match timeout(SESSION_TIMEOUT, session_exchange(&mut stream, role)).await {
        Ok(result) => result,
        Err(_) => Err(ProtoError::SessionTimeout),
    }
}

/// The sequential session pipeline: handshake, receive text, receive key,
/// transform, send result. Ordering is enforced by the awaits themselves.
async fn session_exchange(
    stream: &mut BufReader<TcpStream>,
    role: Role,
) -> Result<bool, ProtoError> {
    if !handshake::verify(stream, role.token()).await? {
        // Deny byte already sent; close without processing anything further.
        return Ok(false);
    }

    let text = recv_framed(stream).await?;
    let key = recv_framed(stream).await?;

    // On any transform failure nothing is written back; the client sees the
    // connection close rather than garbled output.
    let output = cipher::transform(&text, &key, role.direction())?;
    send_framed(stream, &output).await?;
    Ok(true)
}
