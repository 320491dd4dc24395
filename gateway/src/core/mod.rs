pub mod convai;
pub mod relay;
pub mod telephony;

// Re-export commonly used types for convenience
pub use convai::{ConvaiConnector, ConvaiError, ConvaiEvent, ConvaiSession};
pub use relay::{AiAction, CallSession, CarrierAction};
pub use telephony::{CallProvider, TelephonyError, TwilioClient};
