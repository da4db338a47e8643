#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use relay_engine::{
    EventSink, FrameTap, InboundFrame, OutboundFrame, RelayConnection, RelayError, RelayEvent,
    RelaySettings, RelayTransport, SessionToken, StaticTokenProvider,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub const CHANNEL: &str = "chan-1";
pub const STREAM: &str = "chunk-sent";

pub fn settings() -> RelaySettings {
    RelaySettings {
        server: "ws://127.0.0.1:1/".to_string(),
        app_id: "app-1".to_string(),
        channel: CHANNEL.to_string(),
        connect_timeout: Duration::from_secs(2),
        ..RelaySettings::default()
    }
}

pub fn static_tokens() -> Arc<StaticTokenProvider> {
    Arc::new(StaticTokenProvider::new(
        SessionToken::new("test-token").expect("token"),
    ))
}

/// Relay side of an in-memory connection.
pub struct FakeRelay {
    pub inbound: UnboundedSender<InboundFrame>,
    pub outbound: UnboundedReceiver<OutboundFrame>,
    pub closed: Arc<AtomicBool>,
}

struct FakeConnection {
    inbound: UnboundedReceiver<InboundFrame>,
    outbound: UnboundedSender<OutboundFrame>,
    closed: Arc<AtomicBool>,
    close_delay: Duration,
}

#[async_trait::async_trait]
impl RelayConnection for FakeConnection {
    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), RelayError> {
        self.outbound
            .send(frame.clone())
            .map_err(|_| RelayError::Transport("relay gone".into()))
    }

    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RelayError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out queued in-memory connections in order; once they run out,
/// opens are rejected.
pub struct FakeTransport {
    pending: Mutex<VecDeque<FakeConnection>>,
    pub opened: AtomicUsize,
}

#[async_trait::async_trait]
impl RelayTransport for FakeTransport {
    async fn open(
        &self,
        _settings: &RelaySettings,
        token: &SessionToken,
    ) -> Result<Box<dyn RelayConnection>, RelayError> {
        assert_eq!(token.expose(), "test-token");
        self.opened.fetch_add(1, Ordering::SeqCst);
        match self.pending.lock().unwrap().pop_front() {
            Some(connection) => Ok(Box::new(connection)),
            None => Err(RelayError::Rejected("no more connections".into())),
        }
    }
}

pub fn fake_pair() -> (Arc<FakeTransport>, FakeRelay) {
    let (transport, mut relays) = fake_relays(1, Duration::ZERO);
    (transport, relays.remove(0))
}

/// Transport serving `count` connections whose `close` takes `close_delay`.
pub fn fake_relays(count: usize, close_delay: Duration) -> (Arc<FakeTransport>, Vec<FakeRelay>) {
    let mut pending = VecDeque::new();
    let mut relays = Vec::new();
    for _ in 0..count {
        let (inbound_tx, inbound_rx) = unbounded_channel();
        let (outbound_tx, outbound_rx) = unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        pending.push_back(FakeConnection {
            inbound: inbound_rx,
            outbound: outbound_tx,
            closed: closed.clone(),
            close_delay,
        });
        relays.push(FakeRelay {
            inbound: inbound_tx,
            outbound: outbound_rx,
            closed,
        });
    }
    let transport = FakeTransport {
        pending: Mutex::new(pending),
        opened: AtomicUsize::new(0),
    };
    (Arc::new(transport), relays)
}

/// Transport whose handshake never completes.
pub struct HangingTransport;

#[async_trait::async_trait]
impl RelayTransport for HangingTransport {
    async fn open(
        &self,
        _settings: &RelaySettings,
        _token: &SessionToken,
    ) -> Result<Box<dyn RelayConnection>, RelayError> {
        std::future::pending().await
    }
}

pub struct TokioSink(pub UnboundedSender<RelayEvent>);

impl EventSink for TokioSink {
    fn emit(&self, event: RelayEvent) {
        let _ = self.0.send(event);
    }
}

pub fn sink() -> (TokioSink, UnboundedReceiver<RelayEvent>) {
    let (tx, rx) = unbounded_channel();
    (TokioSink(tx), rx)
}

pub async fn next_event(rx: &mut UnboundedReceiver<RelayEvent>) -> RelayEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within timeout")
        .expect("sink open")
}

#[derive(Default)]
pub struct RecordingTap {
    pub inbound: Mutex<Vec<InboundFrame>>,
    pub outbound: Mutex<Vec<OutboundFrame>>,
}

impl FrameTap for RecordingTap {
    fn inbound(&self, frame: &InboundFrame) {
        self.inbound.lock().unwrap().push(frame.clone());
    }

    fn outbound(&self, frame: &OutboundFrame) {
        self.outbound.lock().unwrap().push(frame.clone());
    }
}

pub fn channel_event(channel: &str, event: &str, payload: serde_json::Value) -> InboundFrame {
    InboundFrame::Event {
        channel: channel.to_string(),
        event: event.to_string(),
        payload,
    }
}
