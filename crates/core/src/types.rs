use launchpad_providers::TokenInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), Vec::new())
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content.into(), Vec::new())
    }

    pub fn bot_with_links(content: impl Into<String>, links: Vec<String>) -> Self {
        Self::new(Role::Bot, content.into(), links)
    }

    fn new(role: Role, content: String, links: Vec<String>) -> Self {
        Self {
            role,
            content,
            links,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Append-only message history. Cleared only as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}

/// The four remote stages of a launch, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Analyze,
    Deploy,
    Mint,
    Tweet,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Analyze, Stage::Deploy, Stage::Mint, Stage::Tweet];

    pub fn id(&self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Deploy => "deploy",
            Stage::Mint => "mint",
            Stage::Tweet => "tweet",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Analyze => "Market Analysis",
            Stage::Deploy => "Contract Deployment",
            Stage::Mint => "Initial Supply",
            Stage::Tweet => "Social Launch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::Analyze => "Analyzing sentiment and market conditions",
            Stage::Deploy => "Creating and deploying smart contract",
            Stage::Mint => "Minting initial token supply",
            Stage::Tweet => "Announcing your token to the world",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Stage::Analyze => 0,
            Stage::Deploy => 1,
            Stage::Mint => 2,
            Stage::Tweet => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Outputs of a fully completed launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchResult {
    pub name: String,
    pub symbol: String,
    pub contract_address: String,
    pub minted_amount: u64,
    pub tweet_confirmation: serde_json::Value,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    EmptyPrompt,
    AlreadyRunning,
}

/// How a call to `run_launch` ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    Succeeded(LaunchResult),
    /// Sentiment was unfavorable; nothing past analysis ran.
    Aborted,
    Failed { stage: Stage, error: String },
    /// Rejected before touching any state.
    Rejected(RejectReason),
    /// The orchestrator was reset while this run was in flight.
    Superseded,
}

/// State transitions published to observers of an orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchEvent {
    Message(ChatMessage),
    TokenInfo(TokenInfo),
    StageStarted(Stage),
    StageCompleted(Stage),
    Aborted,
    Failed(Stage),
    Succeeded(LaunchResult),
    Reset,
}

/// Consistent copy of an orchestrator's state bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSnapshot {
    pub current_stage: Option<Stage>,
    pub completed_stages: Vec<Stage>,
    pub token_info: Option<TokenInfo>,
    pub contract_address: Option<String>,
    pub result: Option<LaunchResult>,
    pub messages: Vec<ChatMessage>,
    pub in_progress: bool,
}
