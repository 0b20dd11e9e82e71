//! Network mode integration tests.
//!
//! Starts the server on an ephemeral loopback port and talks to it with a
//! real WebSocket client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tilegame_server::commands::builtin_registry;
use tilegame_server::config::ServerConfig;
use tilegame_server::interpreter::Interpreter;
use tilegame_server::server;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<tilegame_server::error::Result<()>>,
}

async fn start_server() -> TestServer {
    let listener = server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let interpreter = Interpreter::new(Arc::new(builtin_registry(3)));
    let settings = ServerConfig::default();
    let token = shutdown.clone();
    let task = tokio::spawn(async move { server::serve(listener, interpreter, &settings, token).await });
    TestServer {
        addr,
        shutdown,
        task,
    }
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _response) = timeout(WAIT, connect_async(format!("ws://{addr}")))
        .await
        .expect("connect timed out")
        .expect("connect failed");
    ws
}

async fn ask(client: &mut Client, command: &str) -> String {
    client
        .send(Message::Text(command.to_string()))
        .await
        .unwrap();
    next_text(client).await
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let message = timeout(WAIT, client.next())
            .await
            .expect("reply timed out")
            .expect("connection closed")
            .expect("read failed");
        if let Message::Text(text) = message {
            return text;
        }
    }
}

#[tokio::test]
async fn test_round_trip() {
    let server = start_server().await;
    let mut client = connect(server.addr).await;

    assert_eq!(ask(&mut client, "add(2,3)").await, "5");
    assert_eq!(ask(&mut client, "grid()").await, "...\n...\n...");
    assert_eq!(
        ask(&mut client, r#"{"Name":"login","Params":["alice"]}"#).await,
        "0"
    );

    server.shutdown.cancel();
    timeout(WAIT, server.task).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn test_errors_keep_the_session_open() {
    let server = start_server().await;
    let mut client = connect(server.addr).await;

    assert_eq!(
        ask(&mut client, "add(2,3").await,
        "Parser: syntax error: ')' not found"
    );
    assert_eq!(
        ask(&mut client, "add(x,3)").await,
        "Caller: argument 0 must be float, got 'x'"
    );
    assert_eq!(ask(&mut client, "mult(2,3)").await, "6");

    server.shutdown.cancel();
}

#[tokio::test]
async fn test_results_go_to_the_sender_only() {
    let server = start_server().await;
    let mut alice = connect(server.addr).await;
    let mut bob = connect(server.addr).await;

    alice
        .send(Message::Text("sum(1,1)".to_string()))
        .await
        .unwrap();
    bob.send(Message::Text("sum(2,2)".to_string()))
        .await
        .unwrap();
    alice
        .send(Message::Text("sum(3,3)".to_string()))
        .await
        .unwrap();

    assert_eq!(next_text(&mut alice).await, "2");
    assert_eq!(next_text(&mut alice).await, "6");
    assert_eq!(next_text(&mut bob).await, "4");

    server.shutdown.cancel();
}

#[tokio::test]
async fn test_disconnect_does_not_affect_other_clients() {
    let server = start_server().await;
    let mut leaving = connect(server.addr).await;
    let mut staying = connect(server.addr).await;

    leaving
        .send(Message::Text("grid()".to_string()))
        .await
        .unwrap();
    leaving.close(None).await.unwrap();
    drop(leaving);

    assert_eq!(ask(&mut staying, "product(6,7)").await, "42");

    server.shutdown.cancel();
}

#[tokio::test]
async fn test_shutdown_closes_sessions() {
    let server = start_server().await;
    let mut client = connect(server.addr).await;
    assert_eq!(ask(&mut client, "logout()").await, "ok");

    server.shutdown.cancel();
    timeout(WAIT, server.task).await.unwrap().unwrap().unwrap();

    let closed = timeout(WAIT, async {
        loop {
            match client.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "client was not disconnected");
}
