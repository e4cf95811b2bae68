//! WebSocket session tests against a live gateway on an ephemeral port.

mod common;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use common::{FIXED_TIMESTAMP, StubBackend, eventually, router, serve};
use futures_util::{SinkExt, StreamExt};
use hashi_server::domain::{BackendError, BackendOperation};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: std::net::SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    socket
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Next text frame as JSON, or None if nothing arrives within `wait`
async fn next_json(socket: &mut Socket, wait: Duration) -> Option<Value> {
    loop {
        let frame = tokio::time::timeout(wait, socket.next()).await.ok()??;
        match frame.ok()? {
            Message::Text(text) => return serde_json::from_str(text.as_str()).ok(),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}

async fn connected_users(addr: std::net::SocketAddr) -> u64 {
    let body: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["connectedUsers"].as_u64().unwrap()
}

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_join_then_message_gets_exactly_one_reply() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"success": true, "response": "Hi alice"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;

    // when (操作):
    send_json(&mut socket, json!({"type": "message", "message": "hello"})).await;

    // then (期待する結果):
    let reply = next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(
        reply,
        json!({
            "type": "message",
            "message": "Hi alice",
            "timestamp": FIXED_TIMESTAMP,
            "success": true
        })
    );
    assert!(
        next_json(&mut socket, Duration::from_millis(300))
            .await
            .is_none()
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, BackendOperation::Chat);
    assert_eq!(calls[0].1.message.as_deref(), Some("hello"));
    assert_eq!(calls[0].1.user_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_reply_goes_only_to_sender() {
    // given (前提条件): 2 つの接続
    let backend = StubBackend::replying(json!({"response": "private"}));
    let addr = serve(router(Arc::new(backend))).await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    send_json(&mut alice, json!({"type": "join", "user_id": "alice"})).await;
    send_json(&mut bob, json!({"type": "join", "user_id": "bob"})).await;

    // when (操作):
    send_json(&mut alice, json!({"type": "message", "message": "secret"})).await;

    // then (期待する結果): 返信は送信元だけに届く
    let reply = next_json(&mut alice, WAIT).await.unwrap();
    assert_eq!(reply["message"], "private");
    assert!(
        next_json(&mut bob, Duration::from_millis(300))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_event_user_id_overrides_joined_user() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"response": "ok"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;

    // when (操作):
    send_json(
        &mut socket,
        json!({"type": "message", "message": "hi", "user_id": "carol"}),
    )
    .await;

    // then (期待する結果):
    next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(backend.calls()[0].1.user_id.as_deref(), Some("carol"));
}

#[tokio::test]
async fn test_message_before_join_uses_connection_id() {
    // given (前提条件): join していない接続
    let backend = StubBackend::replying(json!({"response": "ok"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;

    // when (操作):
    send_json(&mut socket, json!({"type": "message", "message": "hi"})).await;

    // then (期待する結果): 接続 ID がユーザー ID として使われ、登録はされない
    let reply = next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(reply["message"], "ok");
    let user_id = backend.calls()[0].1.user_id.clone().unwrap();
    assert!(uuid::Uuid::parse_str(&user_id).is_ok());
    assert_eq!(connected_users(addr).await, 0);
}

#[tokio::test]
async fn test_plain_text_frame_is_treated_as_message() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"response": "echo"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;

    // when (操作):
    socket
        .send(Message::Text("just text".to_string().into()))
        .await
        .unwrap();

    // then (期待する結果):
    let reply = next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(reply["message"], "echo");
    assert_eq!(backend.calls()[0].1.message.as_deref(), Some("just text"));
}

#[tokio::test]
async fn test_empty_message_gets_failure_reply() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"response": "unused"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;

    // when (操作):
    send_json(&mut socket, json!({"type": "message", "message": "  "})).await;

    // then (期待する結果):
    let reply = next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(reply["type"], "message");
    assert_eq!(reply["success"], false);
    assert_eq!(reply["message"], "Message cannot be empty");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_backend_failure_gets_error_reply() {
    // given (前提条件):
    let backend = StubBackend::failing(BackendError::Unreachable("refused".to_string()));
    let addr = serve(router(Arc::new(backend))).await;
    let mut socket = connect(addr).await;

    // when (操作):
    send_json(&mut socket, json!({"type": "message", "message": "hi"})).await;

    // then (期待する結果): エラー種別だけが伝わり、詳細は含まれない
    let reply = next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(reply["success"], false);
    let text = reply["message"].as_str().unwrap();
    assert!(text.contains("unreachable"));
    assert!(!text.contains("refused"));
}

#[tokio::test]
async fn test_connected_users_follows_join_and_disconnect() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"response": "ok"}));
    let addr = serve(router(Arc::new(backend))).await;
    let mut socket = connect(addr).await;

    // when (操作): join する
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;

    // then (期待する結果):
    assert!(eventually(WAIT, || async { connected_users(addr).await == 1 }).await);

    // when (操作): 切断する
    socket.close(None).await.unwrap();
    drop(socket);

    // then (期待する結果):
    assert!(eventually(WAIT, || async { connected_users(addr).await == 0 }).await);
}

#[tokio::test]
async fn test_rejoin_replaces_user_without_double_counting() {
    // given (前提条件):
    let backend = StubBackend::replying(json!({"response": "ok"}));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;

    // when (操作):
    send_json(&mut socket, json!({"type": "join", "user_id": "alice2"})).await;
    send_json(&mut socket, json!({"type": "message", "message": "hi"})).await;

    // then (期待する結果):
    next_json(&mut socket, WAIT).await.unwrap();
    assert_eq!(backend.calls()[0].1.user_id.as_deref(), Some("alice2"));
    assert_eq!(connected_users(addr).await, 1);
}

#[tokio::test]
async fn test_disconnect_during_backend_call_is_seen_immediately() {
    // given (前提条件): 応答に 4 秒かかるバックエンドと join 済みの接続
    let backend = StubBackend::replying(json!({"response": "late"}))
        .with_delay(Duration::from_secs(4));
    let addr = serve(router(Arc::new(backend))).await;
    let mut socket = connect(addr).await;
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;
    assert!(eventually(WAIT, || async { connected_users(addr).await == 1 }).await);
    send_json(&mut socket, json!({"type": "message", "message": "hi"})).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // when (操作): バックエンド呼び出し中に切断する
    let closed_at = Instant::now();
    socket.close(None).await.unwrap();
    drop(socket);

    // then (期待する結果): バックエンドの応答を待たずに登録が消える
    assert!(eventually(Duration::from_secs(1), || async { connected_users(addr).await == 0 }).await);
    assert!(closed_at.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_events_are_handled_in_arrival_order() {
    // given (前提条件): 遅いバックエンド
    let backend = StubBackend::new(|_, payload| {
        hashi_server::domain::BackendReply::from_value(json!({"response": payload.message.clone()}))
    })
    .with_delay(Duration::from_millis(100));
    let addr = serve(router(Arc::new(backend.clone()))).await;
    let mut socket = connect(addr).await;

    // when (操作): join の直後に 2 通送る
    send_json(&mut socket, json!({"type": "join", "user_id": "alice"})).await;
    send_json(&mut socket, json!({"type": "message", "message": "first"})).await;
    send_json(&mut socket, json!({"type": "message", "message": "second"})).await;

    // then (期待する結果): 返信は送信順に届き、どちらも join したユーザーで中継される
    assert_eq!(next_json(&mut socket, WAIT).await.unwrap()["message"], "first");
    assert_eq!(next_json(&mut socket, WAIT).await.unwrap()["message"], "second");
    let calls = backend.calls();
    assert!(calls.iter().all(|(_, p)| p.user_id.as_deref() == Some("alice")));
}
