pub mod agents;
pub mod chat;
pub mod format;
pub mod metrics;
pub mod orchestrator;
pub mod progress;
pub mod types;

pub use agents::{AgentConfig, AgentError, AgentManager};
pub use chat::{ChatReply, ChatSession};
pub use metrics::{Metrics, MetricsSnapshot};
pub use orchestrator::{announcement, mint_amount, LaunchOrchestrator, DEFAULT_EXPLORER_URL};
pub use progress::{ProgressError, StageProgress};
pub use types::*;

pub use launchpad_providers::{MintRequest, TokenInfo};
