//! Twilio Media Streams wire format
//!
//! Twilio sends JSON text frames tagged by `event`:
//!
//! - `connected` - WebSocket established, sent once before `start`
//! - `start` - Stream started, carries `streamSid`
//! - `media` - Base64 mu-law 8kHz audio in `media.payload`
//! - `mark` / `dtmf` - Playback markers and key presses
//! - `stop` - Stream ended
//!
//! The bridge sends `media` (audio for the caller) and `clear` (flush
//! queued playback) frames back.

use serde::{Deserialize, Serialize};

// =============================================================================
// Incoming Messages (Twilio -> Bridge)
// =============================================================================

/// Frame received from Twilio on the media stream socket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum CarrierEvent {
    /// Socket handshake acknowledgement
    Connected {
        #[serde(default)]
        protocol: Option<String>,
    },

    /// Stream metadata, first frame carrying the stream identifier
    Start { start: StreamStart },

    /// Caller audio chunk
    Media { media: InboundMedia },

    /// Playback marker echoed back by Twilio
    Mark {
        #[serde(default)]
        mark: Option<MarkPayload>,
    },

    /// Stream ended
    Stop {
        #[serde(rename = "streamSid", default)]
        stream_sid: Option<String>,
    },

    /// Any event the bridge does not act on (e.g. `dtmf`)
    #[serde(other)]
    Unknown,
}

/// Payload of the `start` event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StreamStart {
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
    #[serde(rename = "callSid", default)]
    pub call_sid: Option<String>,
}

/// Payload of the inbound `media` event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InboundMedia {
    /// Base64 encoded audio, forwarded untouched
    pub payload: String,
    #[serde(default)]
    pub track: Option<String>,
}

/// Payload of the `mark` event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MarkPayload {
    pub name: String,
}

// =============================================================================
// Outgoing Messages (Bridge -> Twilio)
// =============================================================================

/// Frame sent to Twilio on the media stream socket.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum CarrierCommand {
    /// Audio to play to the caller
    Media {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        media: OutboundMedia,
    },

    /// Discard any audio Twilio has queued for playback
    Clear {
        #[serde(rename = "streamSid")]
        stream_sid: String,
    },
}

/// Payload of the outbound `media` frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundMedia {
    pub payload: String,
}

impl CarrierCommand {
    pub fn media(stream_sid: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Media {
            stream_sid: stream_sid.into(),
            media: OutboundMedia {
                payload: payload.into(),
            },
        }
    }

    pub fn clear(stream_sid: impl Into<String>) -> Self {
        Self::Clear {
            stream_sid: stream_sid.into(),
        }
    }
}
