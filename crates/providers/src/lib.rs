pub mod http;
pub mod traits;
pub mod types;

pub use http::{BackendConfig, Endpoints, HttpBackend};
pub use traits::{AgentDirectory, BackendError, ChatBackend, LaunchBackend};
pub use types::{ChatResponse, MintRequest, TokenInfo};
