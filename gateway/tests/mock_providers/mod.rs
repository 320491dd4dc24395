//! Mock provider servers for integration tests
//!
//! - `convai_mock` - ElevenLabs Conversational AI WebSocket

#![allow(dead_code)]

pub mod convai_mock;

pub use convai_mock::{MockConvaiConnection, MockConvaiServer};
