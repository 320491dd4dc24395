use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::core::convai::ConvaiConnector;
use crate::core::telephony::{CallProvider, TwilioClient};

/// Shared state handed to every route.
pub struct AppState {
    pub config: ServerConfig,
    /// Places outbound calls
    pub call_provider: Arc<dyn CallProvider>,
    /// Opens one conversational AI socket per media stream
    pub convai: ConvaiConnector,
}

impl AppState {
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let call_provider: Arc<dyn CallProvider> = Arc::new(TwilioClient::from_config(&config));
        Self::with_call_provider(config, call_provider)
    }

    /// Build state around a caller supplied call provider.
    pub fn with_call_provider(
        config: ServerConfig,
        call_provider: Arc<dyn CallProvider>,
    ) -> Arc<Self> {
        let convai = ConvaiConnector::from_config(&config);
        info!(
            agent_id = %convai.agent_id(),
            signed_url = config.elevenlabs_api_key.is_some(),
            "Application state initialized"
        );

        Arc::new(Self {
            config,
            call_provider,
            convai,
        })
    }
}
