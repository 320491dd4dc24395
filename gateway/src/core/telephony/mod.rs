//! Telephony provider integration (Twilio).
//!
//! - `messages` - Media Streams WebSocket frames
//! - `twiml` - Voice webhook response documents
//! - `client` - REST client used to place outbound calls

pub mod client;
pub mod messages;
pub mod twiml;

pub use client::{CallProvider, TelephonyError, TelephonyResult, TwilioClient};
pub use messages::{CarrierCommand, CarrierEvent, InboundMedia, OutboundMedia, StreamStart};
pub use twiml::{MEDIA_STREAM_PATH, connect_stream, media_stream_url};
