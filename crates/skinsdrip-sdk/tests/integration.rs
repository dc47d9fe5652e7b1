//! Integration tests wiring the event channel and the completion tracker
//! together the way the SDK facade does, against an in-process WebSocket
//! server. A live-API test is included but ignored by default.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use skinsdrip_sdk::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

struct MockOrders {
    polls: AtomicUsize,
    status: OrderStatus,
}

impl MockOrders {
    fn new(status: OrderStatus) -> Arc<Self> {
        Arc::new(Self {
            polls: AtomicUsize::new(0),
            status,
        })
    }
}

#[async_trait]
impl OrderStatusSource for MockOrders {
    async fn fetch_order(&self, order_id: &str) -> SkinsdripResult<Order> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(Order {
            order_id: order_id.to_string(),
            status: self.status,
            steamid: None,
            created_at: None,
        })
    }
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    (listener, url)
}

fn channel_for(url: &str) -> EventChannel {
    EventChannel::new(
        SessionToken::new("session"),
        ChannelConfig::new()
            .with_endpoint(Endpoint::Custom(url.to_string()))
            .with_heartbeat_interval(Duration::from_millis(200))
            .with_reconnect_delay(Duration::from_millis(50)),
    )
}

/// A completion frame on the stream must evict the tracker entry and fire
/// the callback exactly once, before the fallback timer gets a chance.
#[tokio::test]
async fn test_stream_completion_end_to_end() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let frame = json!({
            "event": "merchant:trade:update",
            "data": {"orderId": "ord_stream", "status": "completed"}
        });
        ws.send(Message::Text(frame.to_string())).await.unwrap();
        while ws.next().await.is_some() {}
    });

    let orders = MockOrders::new(OrderStatus::Completed);
    let tracker = Arc::new(PendingTradeTracker::new(
        Arc::clone(&orders) as Arc<dyn OrderStatusSource>,
        TrackerConfig::new().with_completion_timeout(Duration::from_secs(600)),
    ));

    let channel = channel_for(&url);
    let hook_tracker = Arc::clone(&tracker);
    channel.set_completion_hook(move |update| hook_tracker.resolve_by_event(update));

    let (tx, mut rx) = mpsc::unbounded_channel();
    tracker
        .register(
            "ord_stream",
            Some(Box::new(move |completion| {
                let _ = tx.send(completion);
            })),
        )
        .unwrap();

    channel.connect();

    let completion = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("completion callback never fired")
        .unwrap();

    assert_eq!(completion.order_id, "ord_stream");
    assert_eq!(completion.status, OrderStatus::Completed);
    assert_eq!(completion.source, CompletionSource::Stream);
    assert_eq!(tracker.pending_count(), 0);
    assert_eq!(orders.polls.load(Ordering::SeqCst), 0);

    channel.disconnect();
}

/// With no completion frame inside the timeout, exactly one status poll is
/// issued and its result reaches the callback.
#[tokio::test]
async fn test_fallback_poll_end_to_end() {
    let (listener, url) = bind().await;

    // Server connects but never sends a completion frame
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        while ws.next().await.is_some() {}
    });

    let orders = MockOrders::new(OrderStatus::Sent);
    let tracker = Arc::new(PendingTradeTracker::new(
        Arc::clone(&orders) as Arc<dyn OrderStatusSource>,
        TrackerConfig::default(),
    ));

    let channel = channel_for(&url);
    let hook_tracker = Arc::clone(&tracker);
    channel.set_completion_hook(move |update| hook_tracker.resolve_by_event(update));
    channel.connect();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tracker
        .register_with_timeout(
            "ord_poll",
            Some(Box::new(move |completion| {
                let _ = tx.send(completion);
            })),
            Duration::from_millis(100),
        )
        .unwrap();

    let completion = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("fallback poll never fired the callback")
        .unwrap();

    assert_eq!(completion.order_id, "ord_poll");
    assert_eq!(completion.status, OrderStatus::Sent);
    assert_eq!(completion.source, CompletionSource::Poll);
    assert_eq!(orders.polls.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.pending_count(), 0);

    channel.disconnect();
}

/// Completion frames for orders this process never registered (e.g. from a
/// previous run) are delivered to subscribers but leave the tracker alone.
#[tokio::test]
async fn test_unregistered_completion_is_harmless() {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let frame = json!({
            "event": "merchant:trade:update",
            "data": {"orderId": "ord_foreign", "status": "completed"}
        });
        ws.send(Message::Text(frame.to_string())).await.unwrap();
        while ws.next().await.is_some() {}
    });

    let orders = MockOrders::new(OrderStatus::Completed);
    let tracker = Arc::new(PendingTradeTracker::new(
        Arc::clone(&orders) as Arc<dyn OrderStatusSource>,
        TrackerConfig::default(),
    ));

    let channel = channel_for(&url);
    let hook_tracker = Arc::clone(&tracker);
    channel.set_completion_hook(move |update| hook_tracker.resolve_by_event(update));

    let (tx, mut rx) = mpsc::unbounded_channel();
    channel.on("trade:update", move |event| {
        let _ = tx.send(event.name().to_string());
    });

    channel.connect();

    let name = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("subscriber never saw the frame")
        .unwrap();
    assert_eq!(name, "trade:update");
    assert_eq!(tracker.pending_count(), 0);

    channel.disconnect();
}

/// Full facade flow against the live test-mode platform.
#[tokio::test]
#[ignore = "Requires SKINSDRIP_MERCHANT_ID / SKINSDRIP_MERCHANT_SECRET and network access"]
async fn test_live_authenticate_and_balance() {
    let creds = MerchantCredentials::from_env().expect("merchant credentials not set");
    let client = SkinsdripClient::builder(creds.merchant_id(), creds.secret())
        .with_testmode(true)
        .build()
        .unwrap();

    client.authenticate().await.expect("authentication failed");
    assert!(client.is_authenticated());

    let balance = client.get_balance().await.expect("balance call failed");
    println!("test-mode balance: {}", balance.balance);

    client
        .subscribe("trade:update", |event| {
            println!("event: {:?}", event);
        })
        .unwrap();

    client.shutdown();
}
