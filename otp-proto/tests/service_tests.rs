#![allow(missing_docs)]
use otp_proto::cipher::{Direction, transform};
use otp_proto::framing::{recv_framed, send_framed};
use otp_proto::handshake::{self, Role};
use otp_proto::server::Server;
use otp_proto::{ProtoError, client};
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Binds a daemon on an ephemeral port and runs it on its own task.
async fn start_daemon(role: Role) -> (u16, CancellationToken, JoinHandle<Result<(), ProtoError>>) {
    let server = Server::bind(0, role).await.unwrap();
    let port = server.local_addr().unwrap().port();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(server.run(shutdown.clone()));
    (port, shutdown, handle)
}

#[tokio::test]
async fn test_encrypt_then_decrypt_roundtrip_over_tcp() {
    let (enc_port, enc_shutdown, enc_handle) = start_daemon(Role::Encrypt).await;
    let (dec_port, dec_shutdown, dec_handle) = start_daemon(Role::Decrypt).await;

    let plaintext = b"THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG";
    let key = b"XMCKL QOWIE URYTP ALSKD JFHGZ MXNCB VQPWO EIRUT";

    let ciphertext = client::run("127.0.0.1", enc_port, Role::Encrypt, plaintext, key)
        .await
        .unwrap();
    assert_ne!(ciphertext.as_slice(), plaintext);

    let recovered = client::run("127.0.0.1", dec_port, Role::Decrypt, &ciphertext, key)
        .await
        .unwrap();
    assert_eq!(recovered.as_slice(), plaintext);

    enc_shutdown.cancel();
    dec_shutdown.cancel();
    enc_handle.await.unwrap().unwrap();
    dec_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_wrong_client_identity_is_refused() {
    let (port, shutdown, handle) = start_daemon(Role::Encrypt).await;

    // A decrypt client knocking on the encrypt daemon's door.
    let err = client::run("127.0.0.1", port, Role::Decrypt, b"HELLO", b"WORLD")
        .await
        .unwrap_err();
    assert!(matches!(err, ProtoError::HandshakeDenied));

    // The daemon must keep serving after a denial.
    let out = client::run("127.0.0.1", port, Role::Encrypt, b"HELLO", b"WORLD")
        .await
        .unwrap();
    assert_eq!(out, transform(b"HELLO", b"WORLD", Direction::Forward).unwrap());

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_concurrent_sessions_do_not_cross_contaminate() {
    let (port, shutdown, handle) = start_daemon(Role::Encrypt).await;

    let mut clients = Vec::new();
    for i in 0..8u32 {
        clients.push(tokio::spawn(async move {
            let text: Vec<u8> = (0..200u32)
                .map(|j| match (i * 31 + j) % 27 {
                    26 => b' ',
                    c => b'A' + c as u8,
                })
                .collect();
            let key: Vec<u8> = (0..200u32)
                .map(|j| match (i * 7 + j * 13 + 5) % 27 {
                    26 => b' ',
                    c => b'A' + c as u8,
                })
                .collect();

            let expected = transform(&text, &key, Direction::Forward).unwrap();
            let got = client::run("127.0.0.1", port, Role::Encrypt, &text, &key)
                .await
                .unwrap();
            assert_eq!(got, expected, "session {i} received someone else's result");
        }));
    }
    for c in clients {
        c.await.unwrap();
    }

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_invalid_payload_closes_session_without_output() {
    let (port, shutdown, handle) = start_daemon(Role::Encrypt).await;

    // Bypass client-side validation and push a lowercase payload.
    let stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let mut stream = BufReader::new(stream);
    handshake::perform(&mut stream, Role::Encrypt.token())
        .await
        .unwrap();
    send_framed(&mut stream, b"hello").await.unwrap();
    send_framed(&mut stream, b"WORLD").await.unwrap();

    // The daemon rejects the transform and closes without sending anything.
    let err = recv_framed(&mut stream).await.unwrap_err();
    assert!(matches!(err, ProtoError::ConnectionClosed));

    // And stays alive for well-formed sessions.
    let out = client::run("127.0.0.1", port, Role::Encrypt, b"HELLO", b"WORLD")
        .await
        .unwrap();
    assert_eq!(out, transform(b"HELLO", b"WORLD", Direction::Forward).unwrap());

    shutdown.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_session() {
    let (port, shutdown, handle) = start_daemon(Role::Encrypt).await;

    // Open a session and stall it halfway through the exchange.
    let stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let mut stream = BufReader::new(stream);
    handshake::perform(&mut stream, Role::Encrypt.token())
        .await
        .unwrap();
    send_framed(&mut stream, b"HELLO").await.unwrap();

    // Shut the daemon down while the session is mid-protocol.
    shutdown.cancel();

    // The in-flight session must still be allowed to complete.
    send_framed(&mut stream, b"WORLD").await.unwrap();
    let result = recv_framed(&mut stream).await.unwrap();
    assert_eq!(
        result,
        transform(b"HELLO", b"WORLD", Direction::Forward).unwrap()
    );

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_clean_shutdown_with_no_sessions() {
    let (_, shutdown, handle) = start_daemon(Role::Decrypt).await;
    shutdown.cancel();
    handle.await.unwrap().unwrap();
}
