//! ElevenLabs Conversational AI WebSocket message types
//!
//! Server events are JSON objects tagged by `type`, each carrying its payload
//! under a `<type>_event` key. Client events are untyped for audio
//! (`{"user_audio_chunk": "..."}`) and typed for everything else.

use serde::{Deserialize, Serialize};

// =============================================================================
// Server Events (ElevenLabs -> Bridge)
// =============================================================================

/// Event received from the conversational AI socket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// First event of a conversation, informational only
    ConversationInitiationMetadata {
        #[serde(default)]
        conversation_initiation_metadata_event: Option<InitiationMetadata>,
    },

    /// Synthesized agent audio
    Audio {
        #[serde(default)]
        audio_event: Option<AudioEvent>,
    },

    /// Caller started speaking over the agent
    Interruption {
        #[serde(default)]
        interruption_event: Option<InterruptionEvent>,
    },

    /// Keep-alive, must be answered with a pong carrying the same event id
    Ping {
        #[serde(default)]
        ping_event: Option<PingEvent>,
    },

    /// Text of the agent's reply
    AgentResponse {
        #[serde(default)]
        agent_response_event: Option<AgentResponseEvent>,
    },

    /// Transcription of what the caller said
    UserTranscript {
        #[serde(default)]
        user_transcription_event: Option<UserTranscriptionEvent>,
    },

    /// Any event type the bridge does not act on
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InitiationMetadata {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub agent_output_audio_format: Option<String>,
    #[serde(default)]
    pub user_input_audio_format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AudioEvent {
    /// Base64 encoded audio in the agent's output format
    #[serde(default)]
    pub audio_base_64: Option<String>,
    #[serde(default)]
    pub event_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InterruptionEvent {
    #[serde(default)]
    pub event_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PingEvent {
    #[serde(default)]
    pub event_id: Option<u64>,
    #[serde(default)]
    pub ping_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AgentResponseEvent {
    #[serde(default)]
    pub agent_response: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserTranscriptionEvent {
    #[serde(default)]
    pub user_transcript: Option<String>,
}

// =============================================================================
// Client Events (Bridge -> ElevenLabs)
// =============================================================================

/// Event sent to the conversational AI socket.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ClientEvent {
    /// Caller audio, base64 encoded in the agent's input format
    UserAudioChunk { user_audio_chunk: String },

    /// Reply to a server ping
    Pong(PongEvent),
}

/// `{"type": "pong", "event_id": N}`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PongEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub event_id: u64,
}

impl ClientEvent {
    pub fn user_audio_chunk(payload: impl Into<String>) -> Self {
        Self::UserAudioChunk {
            user_audio_chunk: payload.into(),
        }
    }

    pub fn pong(event_id: u64) -> Self {
        Self::Pong(PongEvent {
            event_type: "pong",
            event_id,
        })
    }
}

/// Response of the signed URL endpoint.
#[derive(Debug, Deserialize)]
pub struct SignedUrlResponse {
    pub signed_url: String,
}
