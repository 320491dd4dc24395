//! HTTP and WebSocket request handlers
//!
//! - `api` - Health check, inbound call webhook, outbound call trigger
//! - `media_stream` - Twilio media stream relay WebSocket

pub mod api;
pub mod media_stream;

pub use media_stream::media_stream_handler;
