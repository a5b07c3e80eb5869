#![deny(missing_docs)]
//! Client front-end for the networked one-time pad service.
//!
//! `otp-client encrypt <text> <key> <port>` submits a plaintext file to the
//! encryption daemon and prints the ciphertext; `decrypt` does the reverse
//! against the decryption daemon. `keygen <length>` prints random key
//! material over the restricted alphabet. Text and key are validated locally
//! before anything touches the network.

use clap::{Parser, Subcommand};
use log::error;
use otp_proto::handshake::Role;
use std::io::Write;
use std::path::{Path, PathBuf};

mod keygen;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Generate a 1024-symbol key\notp-client keygen 1024 > mykey\n\n# Encrypt a plaintext file against the daemon on port 57171\notp-client encrypt plaintext mykey 57171 > ciphertext\n\n# Decrypt it back\notp-client decrypt ciphertext mykey 57172"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a plaintext file for encryption
    Encrypt {
        /// File holding the text to encrypt (A-Z and space only)
        text: PathBuf,
        /// File holding the key (at least as long as the text)
        key: PathBuf,
        /// Port the encryption daemon listens on
        port: u16,
        /// Host the daemon runs on
        #[arg(long, default_value = "localhost")]
        host: String,
    },
    /// Submit a ciphertext file for decryption
    Decrypt {
        /// File holding the ciphertext to decrypt
        text: PathBuf,
        /// File holding the key used to encrypt it
        key: PathBuf,
        /// Port the decryption daemon listens on
        port: u16,
        /// Host the daemon runs on
        #[arg(long, default_value = "localhost")]
        host: String,
    },
    /// Print random key material over the restricted alphabet
    Keygen {
        /// Number of symbols to generate
        length: usize,
    },
}

/// Reads an input file as bytes, stripping the single trailing newline most
/// text files carry. All other content is left for protocol validation.
fn load_input(path: &Path) -> Vec<u8> {
    let mut data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            error!("cannot read '{}': {e}", path.display());
            std::process::exit(1);
        }
    };
    if data.last() == Some(&b'\n') {
        data.pop();
    }
    data
}

async fn submit(host: &str, port: u16, role: Role, text: &Path, key: &Path) {
    let text = load_input(text);
    let key = load_input(key);

    match otp_proto::client::run(host, port, role, &text, &key).await {
        Ok(output) => {
            println!("{}", String::from_utf8_lossy(&output));
        }
        Err(e) => {
            error!("{} request failed: {e}", role.name());
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt {
            text,
            key,
            port,
            host,
        } => submit(&host, port, Role::Encrypt, &text, &key).await,
        Commands::Decrypt {
            text,
            key,
            port,
            host,
        } => submit(&host, port, Role::Decrypt, &text, &key).await,
        Commands::Keygen { length } => {
            let key = keygen::generate_key(length);
            let mut stdout = std::io::stdout().lock();
            if stdout
                .write_all(&key)
                .and_then(|()| stdout.write_all(b"\n"))
                .is_err()
            {
                std::process::exit(1);
            }
        }
    }
}
