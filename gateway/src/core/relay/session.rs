//! Per-call relay state and message translation.
//!
//! [`CallSession`] holds everything one call needs to translate frames
//! between Twilio and ElevenLabs. It performs no I/O: each handler returns an
//! action for the socket task to carry out, which keeps the protocol rules
//! testable without sockets.

use tracing::debug;
use uuid::Uuid;

use crate::core::convai::{ClientEvent, ServerEvent};
use crate::core::telephony::{CarrierCommand, CarrierEvent};

/// What to do with a frame received from the carrier.
#[derive(Debug, Clone, PartialEq)]
pub enum CarrierAction {
    /// Stream identifier recorded; nothing to forward
    StreamStarted(String),
    /// Forward to the AI socket if it is open, drop otherwise
    ForwardToAi(ClientEvent),
    /// Close the AI socket if it is open
    CloseAi,
    /// Nothing to do
    Ignore,
}

/// What to do with an event received from the AI socket.
#[derive(Debug, Clone, PartialEq)]
pub enum AiAction {
    /// Send to the caller
    ToCarrier(CarrierCommand),
    /// Reply on the AI socket itself
    ReplyToAi(ClientEvent),
    /// Nothing to do
    Ignore,
}

/// State of one call, owned by the task serving its media stream.
#[derive(Debug)]
pub struct CallSession {
    id: Uuid,
    stream_sid: Option<String>,
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CallSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stream_sid: None,
        }
    }

    /// Local identifier used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Twilio stream identifier, set once `start` has been received.
    pub fn stream_sid(&self) -> Option<&str> {
        self.stream_sid.as_deref()
    }

    /// Translate a carrier frame.
    pub fn on_carrier_event(&mut self, event: CarrierEvent) -> CarrierAction {
        match event {
            CarrierEvent::Start { start } => {
                self.stream_sid = Some(start.stream_sid.clone());
                CarrierAction::StreamStarted(start.stream_sid)
            }
            CarrierEvent::Media { media } => {
                CarrierAction::ForwardToAi(ClientEvent::user_audio_chunk(media.payload))
            }
            CarrierEvent::Stop { .. } => CarrierAction::CloseAi,
            CarrierEvent::Connected { .. } | CarrierEvent::Mark { .. } | CarrierEvent::Unknown => {
                CarrierAction::Ignore
            }
        }
    }

    /// Translate an AI event.
    ///
    /// Frames bound for the carrier need the stream identifier; until Twilio
    /// has sent `start` there is nothing to tag them with and they are dropped.
    pub fn on_ai_event(&self, event: ServerEvent) -> AiAction {
        match event {
            ServerEvent::ConversationInitiationMetadata {
                conversation_initiation_metadata_event,
            } => {
                debug!(
                    conversation_id = ?conversation_initiation_metadata_event
                        .and_then(|m| m.conversation_id),
                    "Received conversation initiation metadata"
                );
                AiAction::Ignore
            }
            ServerEvent::Audio { audio_event } => {
                let Some(payload) = audio_event.and_then(|a| a.audio_base_64) else {
                    return AiAction::Ignore;
                };
                match self.stream_sid.as_deref() {
                    Some(stream_sid) => {
                        AiAction::ToCarrier(CarrierCommand::media(stream_sid, payload))
                    }
                    None => {
                        debug!("Dropping agent audio received before stream start");
                        AiAction::Ignore
                    }
                }
            }
            ServerEvent::Interruption { .. } => match self.stream_sid.as_deref() {
                Some(stream_sid) => AiAction::ToCarrier(CarrierCommand::clear(stream_sid)),
                None => AiAction::Ignore,
            },
            ServerEvent::Ping { ping_event } => match ping_event.and_then(|p| p.event_id) {
                Some(event_id) => AiAction::ReplyToAi(ClientEvent::pong(event_id)),
                None => AiAction::Ignore,
            },
            ServerEvent::AgentResponse {
                agent_response_event,
            } => {
                if let Some(text) = agent_response_event.and_then(|e| e.agent_response) {
                    debug!(agent_response = %text, "Agent response");
                }
                AiAction::Ignore
            }
            ServerEvent::UserTranscript {
                user_transcription_event,
            } => {
                if let Some(text) = user_transcription_event.and_then(|e| e.user_transcript) {
                    debug!(user_transcript = %text, "User transcript");
                }
                AiAction::Ignore
            }
            ServerEvent::Unknown => AiAction::Ignore,
        }
    }
}
