use launchpad_providers::{AgentDirectory, BackendError};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent description is empty")]
    EmptyPrompt,
    #[error("Agent name is empty")]
    EmptyName,
    #[error("Invalid agent config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A generated agent definition. `raw` is forwarded to the backend untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub raw: Value,
}

impl AgentConfig {
    /// Accepts the config as an object or as a JSON-encoded string.
    pub fn decode(value: Value) -> Result<Self, AgentError> {
        let raw = match value {
            Value::String(text) => serde_json::from_str::<Value>(&text)
                .map_err(|e| AgentError::InvalidConfig(e.to_string()))?,
            other => other,
        };

        if !raw.is_object() {
            return Err(AgentError::InvalidConfig(
                "expected a JSON object".to_string(),
            ));
        }

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        validate_name(&name)?;

        Ok(Self { name, raw })
    }
}

// The backend stores configs as `<name>.json`.
fn validate_name(name: &str) -> Result<(), AgentError> {
    if name.is_empty() {
        return Err(AgentError::EmptyName);
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(AgentError::InvalidConfig(format!(
            "agent name {:?} is not a plain file name",
            name
        )));
    }
    Ok(())
}

pub struct AgentManager {
    directory: Arc<dyn AgentDirectory>,
}

impl AgentManager {
    pub fn new(directory: Arc<dyn AgentDirectory>) -> Self {
        Self { directory }
    }

    pub async fn list_agents(&self) -> Result<Vec<String>, AgentError> {
        Ok(self.directory.list_agents().await?)
    }

    /// Generates a config from `prompt`, then registers it.
    pub async fn create_agent(&self, prompt: &str) -> Result<AgentConfig, AgentError> {
        if prompt.trim().is_empty() {
            return Err(AgentError::EmptyPrompt);
        }

        let generated = self.directory.generate_agent_config(prompt).await?;
        let config = AgentConfig::decode(generated)?;
        self.directory.register_agent(&config.raw).await?;

        info!("Agent created: {}", config.name);
        Ok(config)
    }

    pub async fn load_agent(&self, name: &str) -> Result<Value, AgentError> {
        let name = name.trim();
        validate_name(name)?;
        let response = self.directory.load_agent(name).await?;
        info!("Agent loaded: {}", name);
        Ok(response)
    }
}
