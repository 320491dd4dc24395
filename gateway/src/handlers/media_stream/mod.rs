//! Twilio media stream WebSocket handler
//!
//! Each accepted socket is one call. The handler opens a conversational AI
//! socket for it and relays frames both ways until the carrier hangs up.
//!
//! ## Twilio -> Bridge
//!
//! - **start**: carries the `streamSid` used to tag outgoing frames
//! - **media**: base64 mu-law caller audio, forwarded as `user_audio_chunk`
//! - **stop**: call ended, the AI socket is closed
//!
//! ## Bridge -> Twilio
//!
//! - **media**: agent audio
//! - **clear**: flush queued agent audio after a barge-in

mod handler;

pub use handler::media_stream_handler;
