//! Remote completion contract and its availability handle.
//!
//! The chat coordinator only ever sees [`CompletionService`]; whether that is
//! the Cohere HTTP client or a test double is decided once at startup through
//! [`ServiceStatus`].

pub mod base_client;
pub mod cohere;

use crate::config::Config;
use crate::core::error::HeartTalkError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub use cohere::CohereClient;

/// Turns one user message into one reply. Calls are stateless: no previous
/// turns are sent along.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, HeartTalkError>;
}

pub type ServiceHandle = Arc<dyn CompletionService>;

/// Result of wiring up the remote service at startup.
#[derive(Clone)]
pub enum ServiceStatus {
    Ready(ServiceHandle),
    Unavailable(String),
}

impl ServiceStatus {
    pub fn ready<S: CompletionService + 'static>(service: S) -> Self {
        ServiceStatus::Ready(Arc::new(service))
    }

    /// Builds the Cohere client from `config`. A missing key or a client
    /// that cannot be built yields `Unavailable` with the reason.
    pub fn from_config(config: &Config) -> Self {
        let api_key = match config.require_api_key() {
            Ok(key) => key,
            Err(e) => {
                warn!("remote completions disabled: {}", e);
                return ServiceStatus::Unavailable(e.to_string());
            }
        };

        match CohereClient::new(config.endpoint(), api_key, config.timeout()) {
            Ok(client) => {
                info!(endpoint = config.endpoint(), "remote completions enabled");
                ServiceStatus::ready(client)
            }
            Err(e) => {
                warn!("remote completions disabled: {}", e);
                ServiceStatus::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ServiceStatus::Ready(_))
    }
}

impl std::fmt::Debug for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Ready(_) => f.write_str("Ready"),
            ServiceStatus::Unavailable(reason) => {
                f.debug_tuple("Unavailable").field(reason).finish()
            }
        }
    }
}
