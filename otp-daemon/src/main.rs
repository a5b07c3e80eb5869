#![deny(missing_docs)]
//! Daemon front-end for the networked one-time pad service.
//!
//! One binary serves both halves of the system: `otp-daemon encrypt <port>`
//! runs the encryption daemon, `otp-daemon decrypt <port>` the decryption
//! daemon. The two differ only in the identity token they accept and the
//! direction the cipher runs.

use clap::{Parser, Subcommand};
use log::{error, info};
use otp_proto::handshake::Role;
use otp_proto::server::Server;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve encryption requests from otp-client encrypt
    Encrypt {
        /// The port to listen on (0 picks an ephemeral port)
        port: u16,
    },
    /// Serve decryption requests from otp-client decrypt
    Decrypt {
        /// The port to listen on (0 picks an ephemeral port)
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let (role, port) = match cli.command {
        Commands::Encrypt { port } => (Role::Encrypt, port),
        Commands::Decrypt { port } => (Role::Decrypt, port),
    };

    let server = match Server::bind(port, role).await {
        Ok(server) => server,
        Err(e) => {
            // A failed bind is fatal at startup; sessions never started.
            error!("failed to bind port {port}: {e}");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            signal_token.cancel();
        }
    });

    if let Err(e) = server.run(shutdown).await {
        error!("daemon failed: {e}");
        std::process::exit(1);
    }
}
