//! Conversational AI provider integration (ElevenLabs).
//!
//! - `messages` - Socket event types in both directions
//! - `client` - Connector and per-call socket session
//!
//! # Audio Format
//!
//! The agent must be configured for mu-law 8kHz input and output so that
//! Twilio payloads can be passed through without transcoding.

pub mod client;
pub mod messages;

pub use client::{
    ConnectionState, ConvaiConnector, ConvaiError, ConvaiEvent, ConvaiResult, ConvaiSession,
};
pub use messages::{ClientEvent, ServerEvent};
