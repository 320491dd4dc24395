//! Twilio <-> ElevenLabs relay.
//!
//! The socket plumbing lives in `handlers::media_stream`; this module holds
//! the per-call state and the translation rules it applies.

mod session;

pub use session::{AiAction, CallSession, CarrierAction};
