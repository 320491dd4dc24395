//! Media Stream Relay Tests
//!
//! Runs the bridge on a local port with the AI endpoint pointed at a mock
//! agent, then plays Twilio against `/media-stream` over a real WebSocket.

mod fixtures;
mod mock_providers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use convai_bridge::{routes, state::AppState};
use mock_providers::{MockConvaiConnection, MockConvaiServer};

type CarrierSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(300);

async fn start_bridge(ai_ws_url: String) -> SocketAddr {
    let mut config = fixtures::test_config();
    config.elevenlabs_ws_url = ai_ws_url;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = routes::create_app(AppState::new(config).await);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Bridge, mock agent and a connected carrier socket whose AI leg is open
async fn connected_call() -> (CarrierSocket, MockConvaiConnection, MockConvaiServer) {
    let mut ai_server = MockConvaiServer::start().await;
    let addr = start_bridge(ai_server.ws_url()).await;

    let (carrier, _) = connect_async(format!("ws://{addr}/media-stream"))
        .await
        .unwrap();
    let mut ai = ai_server.accept().await;
    ai.sync(1).await;

    (carrier, ai, ai_server)
}

async fn carrier_send(carrier: &mut CarrierSocket, value: Value) {
    carrier
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn carrier_recv(carrier: &mut CarrierSocket) -> Value {
    loop {
        let msg = timeout(RECV_TIMEOUT, carrier.next())
            .await
            .expect("Timed out waiting for a frame to Twilio")
            .expect("Carrier socket ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert the bridge sends nothing to the carrier and keeps the socket open
async fn assert_carrier_quiet(carrier: &mut CarrierSocket) {
    assert!(
        timeout(QUIET_PERIOD, carrier.next()).await.is_err(),
        "Expected no frame to Twilio"
    );
}

fn start_frame(stream_sid: &str) -> Value {
    json!({
        "event": "start",
        "sequenceNumber": "1",
        "start": {
            "streamSid": stream_sid,
            "callSid": "CA123",
            "tracks": ["inbound"],
            "mediaFormat": { "encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1 }
        },
        "streamSid": stream_sid
    })
}

fn media_frame(payload: &str) -> Value {
    json!({
        "event": "media",
        "media": { "track": "inbound", "chunk": "1", "timestamp": "5", "payload": payload },
        "streamSid": "MZ1"
    })
}

/// Send `start` then one media frame and wait for it to reach the agent
async fn start_stream(carrier: &mut CarrierSocket, ai: &mut MockConvaiConnection) {
    carrier_send(carrier, start_frame("MZ1")).await;
    carrier_send(carrier, media_frame("c3luYw==")).await;
    assert_eq!(
        ai.recv_json().await,
        Some(json!({ "user_audio_chunk": "c3luYw==" }))
    );
}

#[tokio::test]
async fn test_ping_answered_without_touching_carrier() {
    let (mut carrier, mut ai, _server) = connected_call().await;

    ai.sync(7).await;
    assert_carrier_quiet(&mut carrier).await;
}

#[tokio::test]
async fn test_caller_audio_forwarded_to_agent() {
    let (mut carrier, mut ai, _server) = connected_call().await;

    carrier_send(&mut carrier, json!({ "event": "connected", "protocol": "Call", "version": "1.0.0" })).await;
    carrier_send(&mut carrier, start_frame("MZ1")).await;
    carrier_send(&mut carrier, media_frame("AAAA")).await;
    carrier_send(&mut carrier, media_frame("BBBB")).await;

    assert_eq!(ai.recv_json().await, Some(json!({ "user_audio_chunk": "AAAA" })));
    assert_eq!(ai.recv_json().await, Some(json!({ "user_audio_chunk": "BBBB" })));
}

#[tokio::test]
async fn test_agent_audio_sent_to_carrier_with_stream_sid() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    ai.send_json(json!({
        "type": "audio",
        "audio_event": { "audio_base_64": "UklGRg==", "event_id": 3 }
    }));

    assert_eq!(
        carrier_recv(&mut carrier).await,
        json!({ "event": "media", "streamSid": "MZ1", "media": { "payload": "UklGRg==" } })
    );
}

#[tokio::test]
async fn test_agent_audio_without_payload_not_forwarded() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    ai.send_json(json!({ "type": "audio", "audio_event": { "event_id": 3 } }));
    ai.send_json(json!({ "type": "agent_response", "agent_response_event": { "agent_response": "Hello" } }));
    ai.send_json(json!({
        "type": "audio",
        "audio_event": { "audio_base_64": "U0VDT05E", "event_id": 4 }
    }));

    // The first frame Twilio sees is the second audio event
    assert_eq!(
        carrier_recv(&mut carrier).await,
        json!({ "event": "media", "streamSid": "MZ1", "media": { "payload": "U0VDT05E" } })
    );
}

#[tokio::test]
async fn test_interruption_clears_carrier_audio() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    ai.send_json(json!({ "type": "interruption", "interruption_event": { "event_id": 9 } }));

    assert_eq!(
        carrier_recv(&mut carrier).await,
        json!({ "event": "clear", "streamSid": "MZ1" })
    );
}

#[tokio::test]
async fn test_stop_closes_agent_socket() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    carrier_send(&mut carrier, json!({ "event": "stop", "streamSid": "MZ1" })).await;
    carrier_send(&mut carrier, media_frame("TEFURQ==")).await;

    assert_eq!(ai.recv_json().await, None);
}

#[tokio::test]
async fn test_carrier_disconnect_closes_agent_socket() {
    let (mut carrier, mut ai, _server) = connected_call().await;

    carrier.close(None).await.unwrap();

    assert_eq!(ai.recv_json().await, None);
}

#[tokio::test]
async fn test_agent_disconnect_keeps_carrier_open() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    ai.close();
    assert_eq!(ai.recv_json().await, None);

    carrier_send(&mut carrier, media_frame("QUZURVI=")).await;
    assert_carrier_quiet(&mut carrier).await;
}

#[tokio::test]
async fn test_malformed_carrier_frame_discarded() {
    let (mut carrier, mut ai, _server) = connected_call().await;

    carrier
        .send(Message::Text("not json".into()))
        .await
        .unwrap();
    carrier_send(&mut carrier, json!({ "event": "media" })).await;

    start_stream(&mut carrier, &mut ai).await;
}

#[tokio::test]
async fn test_malformed_agent_frame_discarded() {
    let (mut carrier, mut ai, _server) = connected_call().await;
    start_stream(&mut carrier, &mut ai).await;

    ai.send_json(json!("not an event"));
    ai.send_json(json!({ "type": "interruption" }));

    assert_eq!(
        carrier_recv(&mut carrier).await,
        json!({ "event": "clear", "streamSid": "MZ1" })
    );
}

#[tokio::test]
async fn test_unreachable_agent_keeps_carrier_open() {
    // Nothing listens on the configured AI endpoint
    let addr = start_bridge("ws://127.0.0.1:9".to_string()).await;
    let (mut carrier, _) = connect_async(format!("ws://{addr}/media-stream"))
        .await
        .unwrap();

    carrier_send(&mut carrier, start_frame("MZ1")).await;
    carrier_send(&mut carrier, media_frame("AAAA")).await;
    assert_carrier_quiet(&mut carrier).await;
}
