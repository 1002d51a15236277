//! End-to-end tests over a real `WebSocket` connection.
//!
//! Each test binds an ephemeral port, serves the router on it, and talks
//! to it with `tokio-tungstenite`.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chowvote_core::{PartyRegistry, SequenceCodes};
use chowvote_server::{AppState, serve};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let registry = PartyRegistry::new().with_code_source(SequenceCodes::new(["FOOD"]));
    let state = Arc::new(AppState::with_registry(registry).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

async fn send(client: &mut Client, frame: Value) {
    client
        .send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
}

async fn next_event(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn create_party_over_websocket() {
    let addr = spawn_server().await;
    let mut host = connect(addr).await;

    send(&mut host, json!({"event": "create_party", "data": {"name": "Ada"}})).await;
    let created = next_event(&mut host).await;
    assert_eq!(
        created,
        json!({
            "event": "party_created",
            "data": {"code": "FOOD", "host": "Ada", "members": ["Ada"]}
        })
    );
}

#[tokio::test]
async fn closing_host_socket_notifies_members() {
    let addr = spawn_server().await;
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;

    send(&mut host, json!({"event": "create_party", "data": {"name": "Ada"}})).await;
    next_event(&mut host).await;

    send(&mut guest, json!({"event": "join_party", "data": {"code": "FOOD", "name": "Bob"}})).await;
    let updated = next_event(&mut guest).await;
    assert_eq!(updated["event"], "party_updated");
    assert_eq!(updated["data"]["members"], json!(["Ada", "Bob"]));

    host.close(None).await.unwrap();
    let left = next_event(&mut guest).await;
    assert_eq!(
        left,
        json!({"event": "host_left", "data": {"message": "Host has left. Lobby disbanded."}})
    );
}

#[tokio::test]
async fn malformed_frame_keeps_connection_open() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;

    send(&mut client, json!({"event": "no_such_event", "data": {}})).await;
    let error = next_event(&mut client).await;
    assert_eq!(error["event"], "error");
    assert!(error["data"]["message"].as_str().unwrap().starts_with("Malformed event: "));

    send(&mut client, json!({"event": "create_party", "data": {"name": "Ada"}})).await;
    assert_eq!(next_event(&mut client).await["event"], "party_created");
}
