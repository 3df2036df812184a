use crate::traits::*;
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Paths of the backend endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub sentiment: String,
    pub token_info: String,
    pub deploy: String,
    pub mint: String,
    pub announce: String,
    pub list_agents: String,
    pub create_agent_file: String,
    pub create_agent: String,
    pub load_agent: String,
    pub chat: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sentiment: "/sentimentAnalysis".to_string(),
            token_info: "/launchpadChat".to_string(),
            deploy: "/deployContract".to_string(),
            mint: "/mintTokens".to_string(),
            announce: "/postTweet".to_string(),
            list_agents: "/listAgents".to_string(),
            create_agent_file: "/createAgentFile".to_string(),
            create_agent: "/createAgent".to_string(),
            load_agent: "/loadAgent".to_string(),
            chat: "/chat".to_string(),
        }
    }
}

impl Endpoints {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("sentiment", self.sentiment.as_str()),
            ("token_info", self.token_info.as_str()),
            ("deploy", self.deploy.as_str()),
            ("mint", self.mint.as_str()),
            ("announce", self.announce.as_str()),
            ("list_agents", self.list_agents.as_str()),
            ("create_agent_file", self.create_agent_file.as_str()),
            ("create_agent", self.create_agent.as_str()),
            ("load_agent", self.load_agent.as_str()),
            ("chat", self.chat.as_str()),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            endpoints: Endpoints::default(),
        }
    }
}

/// JSON-over-HTTP client for the agent backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        Self::decode(response).await
    }

    async fn get_json<T>(&self, path: &str, query: Option<(&str, &str)>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.url(path);
        if let Some((key, value)) = query {
            url = format!("{}?{}={}", url, key, urlencoding::encode(value));
        }
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Checks that the backend answers at all; any HTTP status counts.
    pub async fn ping(&self) -> Result<u16, BackendError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl LaunchBackend for HttpBackend {
    async fn analyze_sentiment(&self, prompt: &str) -> Result<bool, BackendError> {
        let response: SentimentResponse = self
            .post_json(&self.endpoints.sentiment, &PromptBody { prompt })
            .await?;
        Ok(response.sentiment)
    }

    async fn extract_token_info(&self, prompt: &str) -> Result<TokenInfo, BackendError> {
        self.post_json(&self.endpoints.token_info, &PromptBody { prompt })
            .await
    }

    async fn deploy_contract(&self, token: &TokenInfo) -> Result<String, BackendError> {
        let value: serde_json::Value = self.post_json(&self.endpoints.deploy, token).await?;
        contract_address(&value)
    }

    async fn mint_tokens(&self, request: &MintRequest) -> Result<serde_json::Value, BackendError> {
        self.post_json(&self.endpoints.mint, request).await
    }

    async fn post_announcement(&self, content: &str) -> Result<serde_json::Value, BackendError> {
        self.post_json(&self.endpoints.announce, &AnnouncementBody { content })
            .await
    }
}

#[async_trait]
impl AgentDirectory for HttpBackend {
    async fn list_agents(&self) -> Result<Vec<String>, BackendError> {
        let response: AgentListResponse = self.get_json(&self.endpoints.list_agents, None).await?;
        Ok(response.agents)
    }

    async fn generate_agent_config(
        &self,
        prompt: &str,
    ) -> Result<serde_json::Value, BackendError> {
        self.post_json(&self.endpoints.create_agent_file, &PromptBody { prompt })
            .await
    }

    async fn register_agent(
        &self,
        config: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        let body = serde_json::json!({ "agentConfig": config });
        self.post_json(&self.endpoints.create_agent, &body).await
    }

    async fn load_agent(&self, name: &str) -> Result<serde_json::Value, BackendError> {
        self.get_json(&self.endpoints.load_agent, Some(("agent_name", name)))
            .await
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, prompt: &str) -> Result<ChatResponse, BackendError> {
        self.post_json(&self.endpoints.chat, &PromptBody { prompt })
            .await
    }
}

/// The deploy endpoint answers with a bare JSON string; some deployments wrap
/// it in an object.
fn contract_address(value: &serde_json::Value) -> Result<String, BackendError> {
    let address = match value {
        serde_json::Value::String(s) => Some(s.as_str()),
        serde_json::Value::Object(map) => map
            .get("contractAddress")
            .or_else(|| map.get("contract_address"))
            .and_then(|v| v.as_str()),
        _ => None,
    };

    match address.map(str::trim) {
        Some(addr) if !addr.is_empty() => Ok(addr.to_string()),
        _ => Err(BackendError::InvalidResponse(format!(
            "no contract address in deploy response: {}",
            value
        ))),
    }
}
