use crate::types::{ChatResponse, MintRequest, TokenInfo};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Remote stages of a token launch.
#[async_trait]
pub trait LaunchBackend: Send + Sync {
    /// Returns `true` when market sentiment favors the launch.
    async fn analyze_sentiment(&self, prompt: &str) -> Result<bool, BackendError>;

    async fn extract_token_info(&self, prompt: &str) -> Result<TokenInfo, BackendError>;

    /// Deploys the token contract and returns its address.
    async fn deploy_contract(&self, token: &TokenInfo) -> Result<String, BackendError>;

    async fn mint_tokens(&self, request: &MintRequest) -> Result<serde_json::Value, BackendError>;

    async fn post_announcement(&self, content: &str) -> Result<serde_json::Value, BackendError>;
}

/// Agent listing, generation and loading.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    async fn list_agents(&self) -> Result<Vec<String>, BackendError>;

    /// Asks the backend to generate an agent config from a description.
    async fn generate_agent_config(&self, prompt: &str)
        -> Result<serde_json::Value, BackendError>;

    /// Persists a generated agent config.
    async fn register_agent(
        &self,
        config: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError>;

    async fn load_agent(&self, name: &str) -> Result<serde_json::Value, BackendError>;
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<ChatResponse, BackendError>;
}
