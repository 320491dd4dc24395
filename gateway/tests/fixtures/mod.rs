//! Test Fixtures Module
//!
//! Shared configuration and a scripted call provider for the bridge tests.

// Not every test binary uses every fixture
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use convai_bridge::ServerConfig;
use convai_bridge::core::telephony::{CallProvider, TelephonyError, TelephonyResult};

/// Minimal valid configuration pointing every upstream at localhost
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8000,
        public_url: "https://bridge.example.com".to_string(),
        elevenlabs_agent_id: "agent-test".to_string(),
        elevenlabs_api_key: None,
        elevenlabs_ws_url: "ws://127.0.0.1:9".to_string(),
        elevenlabs_api_url: "http://127.0.0.1:9".to_string(),
        twilio_account_sid: "AC123".to_string(),
        twilio_auth_token: "token-test".to_string(),
        twilio_phone_number: "+15550000000".to_string(),
        twilio_api_url: "http://127.0.0.1:9".to_string(),
    }
}

/// Call provider that records requests and answers from a script
pub struct FakeCallProvider {
    result: Result<String, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeCallProvider {
    pub fn succeeding(call_sid: &str) -> Self {
        Self::with_result(Ok(call_sid.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_result(Err(message.to_string()))
    }

    fn with_result(result: Result<String, String>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(to, callback_url)` pairs in call order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallProvider for FakeCallProvider {
    async fn create_call(&self, to: &str, callback_url: &str) -> TelephonyResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((to.to_string(), callback_url.to_string()));

        match &self.result {
            Ok(call_sid) => Ok(call_sid.clone()),
            Err(message) => Err(TelephonyError::Api {
                status: 400,
                message: message.clone(),
            }),
        }
    }
}
