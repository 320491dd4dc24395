//! ElevenLabs Conversational AI socket client.
//!
//! # API Reference
//!
//! - Public agents: `wss://api.elevenlabs.io/v1/convai/conversation?agent_id=<id>`
//! - Private agents: a signed URL fetched from
//!   `GET /v1/convai/conversation/get_signed_url?agent_id=<id>` with the `xi-api-key` header
//! - Protocol: WebSocket with JSON text frames
//!
//! Each call gets its own [`ConvaiSession`]. Opening a session returns
//! immediately; the connection is established by a spawned task, and the
//! session reports [`ConvaiEvent::Opened`] once the socket is usable. Sends
//! are rejected until then, so callers drop audio rather than buffer it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::messages::{ClientEvent, ServerEvent, SignedUrlResponse};
use crate::config::ServerConfig;

/// Errors that can occur on the conversational AI side.
#[derive(Debug, Error)]
pub enum ConvaiError {
    /// Signed URL request failed
    #[error("Failed to obtain signed URL: {0}")]
    SignedUrl(String),

    /// Invalid endpoint configuration
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// WebSocket handshake failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Socket is not open (still connecting or already closed)
    #[error("Not connected")]
    NotConnected,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for conversational AI operations.
pub type ConvaiResult<T> = Result<T, ConvaiError>;

/// Lifecycle of one AI socket.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// Connection state shared between the session handle and its socket task.
///
/// Transitions are one-way: Connecting -> Open -> Closed, or Connecting -> Closed.
#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Connecting as u8))
    }

    fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Move Connecting -> Open. Fails if the session was closed meanwhile.
    fn try_open(&self) -> bool {
        self.0
            .compare_exchange(
                ConnectionState::Connecting as u8,
                ConnectionState::Open as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Mark closed, returning the previous state.
    fn close(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.swap(ConnectionState::Closed as u8, Ordering::SeqCst))
    }
}

/// Notifications from the socket task.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvaiEvent {
    /// Handshake completed, sends are now accepted
    Opened,
    /// Parsed server event
    Message(ServerEvent),
    /// Socket closed (by either side) or failed to open
    Closed,
}

enum ConvaiCommand {
    Send(ClientEvent),
    Close,
}

/// Builds AI socket sessions for the configured agent.
#[derive(Clone)]
pub struct ConvaiConnector {
    http: reqwest::Client,
    ws_url: String,
    api_url: String,
    agent_id: String,
    api_key: Option<String>,
}

impl ConvaiConnector {
    pub fn new(
        ws_url: impl Into<String>,
        api_url: impl Into<String>,
        agent_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            ws_url: ws_url.into(),
            api_url: api_url.into(),
            agent_id: agent_id.into(),
            api_key,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.elevenlabs_ws_url.clone(),
            config.elevenlabs_api_url.clone(),
            config.elevenlabs_agent_id.clone(),
            config.elevenlabs_api_key.clone(),
        )
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Public agent endpoint: `{ws_url}?agent_id=<id>`.
    pub fn public_url(&self) -> ConvaiResult<String> {
        let url = url::Url::parse_with_params(&self.ws_url, &[("agent_id", &self.agent_id)])?;
        Ok(url.to_string())
    }

    /// Request a signed conversation URL for a private agent.
    pub async fn fetch_signed_url(&self, api_key: &str) -> ConvaiResult<String> {
        let endpoint = url::Url::parse_with_params(
            &format!(
                "{}/v1/convai/conversation/get_signed_url",
                self.api_url.trim_end_matches('/')
            ),
            &[("agent_id", &self.agent_id)],
        )?;

        let response = self
            .http
            .get(endpoint)
            .header("xi-api-key", api_key)
            .send()
            .await
            .map_err(|e| ConvaiError::SignedUrl(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvaiError::SignedUrl(format!("{status}: {body}")));
        }

        let signed: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| ConvaiError::SignedUrl(e.to_string()))?;

        Ok(signed.signed_url)
    }

    /// URL to open the conversation socket on.
    ///
    /// Uses a signed URL when an API key is configured, the public endpoint otherwise.
    pub async fn resolve_url(&self) -> ConvaiResult<String> {
        match self.api_key.as_deref() {
            Some(api_key) => self.fetch_signed_url(api_key).await,
            None => self.public_url(),
        }
    }

    /// Start opening a new AI socket and return its session handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&self) -> ConvaiSession {
        let state = Arc::new(SharedState::new());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_connection(
            self.clone(),
            state.clone(),
            command_rx,
            event_tx,
        ));

        ConvaiSession {
            state,
            commands: command_tx,
            events: event_rx,
        }
    }
}

impl Drop for ConvaiConnector {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}

/// Handle to one AI socket.
///
/// Dropping the handle closes the socket, so the connection never outlives
/// the call session that owns it.
pub struct ConvaiSession {
    state: Arc<SharedState>,
    commands: mpsc::UnboundedSender<ConvaiCommand>,
    events: mpsc::UnboundedReceiver<ConvaiEvent>,
}

impl ConvaiSession {
    pub fn state(&self) -> ConnectionState {
        self.state.load()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Queue an event for the socket. Fire-and-forget; fails only if not open.
    pub fn send(&self, event: ClientEvent) -> ConvaiResult<()> {
        if !self.is_open() {
            return Err(ConvaiError::NotConnected);
        }
        self.commands
            .send(ConvaiCommand::Send(event))
            .map_err(|_| ConvaiError::NotConnected)
    }

    /// Close the socket. Returns false if it was already closed.
    pub fn close(&self) -> bool {
        if self.state.close() == ConnectionState::Closed {
            return false;
        }
        let _ = self.commands.send(ConvaiCommand::Close);
        true
    }

    /// Next notification from the socket task; `None` once the task has exited.
    pub async fn recv(&mut self) -> Option<ConvaiEvent> {
        self.events.recv().await
    }
}

impl Drop for ConvaiSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(
    connector: ConvaiConnector,
    state: Arc<SharedState>,
    mut commands: mpsc::UnboundedReceiver<ConvaiCommand>,
    events: mpsc::UnboundedSender<ConvaiEvent>,
) {
    let url = match connector.resolve_url().await {
        Ok(url) => url,
        Err(e) => {
            error!(agent_id = %connector.agent_id, "Failed to resolve conversation URL: {}", e);
            state.close();
            let _ = events.send(ConvaiEvent::Closed);
            return;
        }
    };

    let ws_stream = match tokio_tungstenite::connect_async(url).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            let e = ConvaiError::ConnectionFailed(e.to_string());
            error!(agent_id = %connector.agent_id, "{}", e);
            state.close();
            let _ = events.send(ConvaiEvent::Closed);
            return;
        }
    };

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    if !state.try_open() {
        debug!("Session closed while connecting, dropping AI socket");
        let _ = ws_sink.send(Message::Close(None)).await;
        let _ = events.send(ConvaiEvent::Closed);
        return;
    }

    info!(agent_id = %connector.agent_id, "Connected to ElevenLabs Conversational AI");
    let _ = events.send(ConvaiEvent::Opened);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(ConvaiCommand::Send(event)) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            error!("Failed to serialize client event: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                        warn!("Failed to send to ElevenLabs: {}", e);
                        break;
                    }
                }
                Some(ConvaiCommand::Close) | None => {
                    info!("Closing ElevenLabs socket");
                    let _ = ws_sink.send(Message::Close(None)).await;
                    break;
                }
            },

            msg = ws_stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            let _ = events.send(ConvaiEvent::Message(event));
                        }
                        Err(e) => {
                            warn!("Discarding malformed ElevenLabs message: {}", e);
                        }
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "ElevenLabs socket closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("ElevenLabs socket error: {}", e);
                    break;
                }
                None => {
                    info!("ElevenLabs socket stream ended");
                    break;
                }
            },
        }
    }

    state.close();
    let _ = events.send(ConvaiEvent::Closed);
}
