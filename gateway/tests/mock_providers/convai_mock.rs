//! ElevenLabs Conversational AI WebSocket mock
//!
//! Accepts bridge connections on a random local port and hands each one to
//! the test as a [`MockConvaiConnection`], so the test scripts both what the
//! agent says and checks what the bridge sent.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MockConvaiServer {
    addr: SocketAddr,
    connections: mpsc::UnboundedReceiver<MockConvaiConnection>,
}

/// One accepted AI socket, seen from the agent side
pub struct MockConvaiConnection {
    outgoing: mpsc::UnboundedSender<Message>,
    incoming: mpsc::UnboundedReceiver<Message>,
}

impl MockConvaiServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let Ok(ws_stream) = accept_async(stream).await else {
                    continue;
                };
                let (mut write, mut read) = ws_stream.split();
                let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
                let (in_tx, in_rx) = mpsc::unbounded_channel::<Message>();

                tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            outgoing = out_rx.recv() => match outgoing {
                                Some(msg) => {
                                    let closing = matches!(msg, Message::Close(_));
                                    if write.send(msg).await.is_err() || closing {
                                        break;
                                    }
                                }
                                None => break,
                            },
                            incoming = read.next() => match incoming {
                                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                                Some(Ok(msg)) => {
                                    let _ = in_tx.send(msg);
                                }
                            },
                        }
                    }
                });

                let _ = conn_tx.send(MockConvaiConnection {
                    outgoing: out_tx,
                    incoming: in_rx,
                });
            }
        });

        Self {
            addr,
            connections: conn_rx,
        }
    }

    /// Base URL to configure as `ELEVENLABS_WS_URL`
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Wait for the bridge to open an AI socket
    pub async fn accept(&mut self) -> MockConvaiConnection {
        timeout(RECV_TIMEOUT, self.connections.recv())
            .await
            .expect("Bridge did not connect to the AI mock in time")
            .expect("AI mock listener stopped")
    }
}

impl MockConvaiConnection {
    pub fn send_json(&self, value: Value) {
        self.outgoing
            .send(Message::Text(value.to_string().into()))
            .unwrap();
    }

    /// Close the socket from the agent side
    pub fn close(&self) {
        let _ = self.outgoing.send(Message::Close(None));
    }

    /// Next JSON text frame from the bridge, `None` once the bridge closed the socket
    pub async fn recv_json(&mut self) -> Option<Value> {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.incoming.recv())
                .await
                .expect("Timed out waiting for a frame from the bridge")?;
            if let Message::Text(text) = msg {
                return Some(serde_json::from_str(text.as_str()).unwrap());
            }
        }
    }

    /// Send a ping and wait for the matching pong, proving the bridge sees the socket as open
    pub async fn sync(&mut self, event_id: u64) {
        self.send_json(serde_json::json!({
            "type": "ping",
            "ping_event": { "event_id": event_id, "ping_ms": 0 }
        }));
        let reply = self.recv_json().await.expect("AI socket closed before pong");
        assert_eq!(
            reply,
            serde_json::json!({ "type": "pong", "event_id": event_id })
        );
    }
}
