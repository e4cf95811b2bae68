//! Shared helpers for the gateway integration tests.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;
use hashi_server::{
    domain::{
        Backend, BackendError, BackendKind, BackendOperation, BackendPayload, BackendReply,
    },
    ui::{AppState, build_router},
};
use hashi_shared::time::FixedClock;
use serde_json::Value;
use tokio::net::TcpListener;

/// 2023-01-01T00:00:00.000Z
pub const FIXED_MILLIS: i64 = 1_672_531_200_000;
pub const FIXED_TIMESTAMP: &str = "2023-01-01T00:00:00.000Z";

type Answer = dyn Fn(BackendOperation, &BackendPayload) -> Result<BackendReply, BackendError>
    + Send
    + Sync;

/// Scripted backend recording every call it receives
#[derive(Clone)]
pub struct StubBackend {
    answer: Arc<Answer>,
    probe: Result<(), BackendError>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(BackendOperation, BackendPayload)>>>,
}

impl StubBackend {
    pub fn new<F>(answer: F) -> Self
    where
        F: Fn(BackendOperation, &BackendPayload) -> Result<BackendReply, BackendError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            answer: Arc::new(answer),
            probe: Ok(()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every operation with the same JSON document
    pub fn replying(reply: Value) -> Self {
        Self::new(move |_, _| BackendReply::from_value(reply.clone()))
    }

    /// Fail every operation and the probe with the same error
    pub fn failing(error: BackendError) -> Self {
        let probe_error = error.clone();
        let mut stub = Self::new(move |_, _| Err(error.clone()));
        stub.probe = Err(probe_error);
        stub
    }

    /// Hold every invocation for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<(BackendOperation, BackendPayload)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Backend for StubBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Http
    }

    async fn invoke(
        &self,
        operation: BackendOperation,
        payload: BackendPayload,
    ) -> Result<BackendReply, BackendError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = (self.answer)(operation, &payload);
        self.calls.lock().unwrap().push((operation, payload));
        result
    }

    async fn probe(&self) -> Result<(), BackendError> {
        self.probe.clone()
    }
}

/// Gateway state around `backend`, with a fixed clock
pub fn app_state(backend: Arc<dyn Backend>) -> Arc<AppState> {
    Arc::new(AppState::with_backend(backend).with_clock(Arc::new(FixedClock::new(FIXED_MILLIS))))
}

pub fn router(backend: Arc<dyn Backend>) -> Router {
    build_router(app_state(backend), None)
}

/// Serve `router` on an ephemeral local port
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A local port with nothing listening on it
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Poll `check` until it holds or `timeout` elapses
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
