//! Chat sessions against a scripted agent.

use async_trait::async_trait;
use launchpad_core::chat::FAILED_MESSAGE;
use launchpad_core::{ChatReply, ChatSession, Role};
use launchpad_providers::{BackendError, ChatBackend, ChatResponse};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct ScriptedChat {
    reply: Result<ChatResponse, BackendError>,
    calls: AtomicUsize,
}

impl ScriptedChat {
    fn replying(reply: Result<ChatResponse, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn chat(&self, _prompt: &str) -> Result<ChatResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(response) => Ok(response.clone()),
            Err(_) => Err(BackendError::Http("connection refused".to_string())),
        }
    }
}

#[tokio::test]
async fn test_ask_records_both_sides_with_links() {
    let backend = ScriptedChat::replying(Ok(ChatResponse {
        status: "success".to_string(),
        result: json!("Swap done."),
        tx_url: Some("https://testnet.sonicscan.org/tx/0x1".to_string()),
    }));
    let mut session = ChatSession::new(backend.clone());

    let reply = session.ask("swap 1 S for USDC").await.unwrap();

    assert!(matches!(reply, ChatReply::Text { .. }));
    let messages = session.messages().to_vec();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "swap 1 S for USDC");
    assert_eq!(messages[1].role, Role::Bot);
    assert_eq!(messages[1].content, "Swap done.");
    assert_eq!(
        messages[1].links,
        vec!["https://testnet.sonicscan.org/tx/0x1".to_string()]
    );
}

#[tokio::test]
async fn test_ask_transport_failure_appends_error_message() {
    let backend = ScriptedChat::replying(Err(BackendError::Http("down".to_string())));
    let mut session = ChatSession::new(backend);

    let reply = session.ask("what's my balance?").await;

    assert_eq!(reply, Some(ChatReply::Failed));
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages().last().unwrap().content, FAILED_MESSAGE);
}

#[tokio::test]
async fn test_ask_balance_uses_small_amount_precision() {
    let backend = ScriptedChat::replying(Ok(ChatResponse {
        status: "success".to_string(),
        result: json!("0.000123"),
        tx_url: None,
    }));
    let mut session = ChatSession::new(backend);

    let reply = session.ask("balance").await;

    assert_eq!(reply, Some(ChatReply::Balance(0.000123)));
    assert_eq!(session.messages().last().unwrap().content, "0.000123");
}

#[tokio::test]
async fn test_blank_prompt_is_ignored() {
    let backend = ScriptedChat::replying(Err(BackendError::Http("unused".to_string())));
    let mut session = ChatSession::new(backend.clone());

    assert_eq!(session.ask("  ").await, None);
    assert!(session.messages().is_empty());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_clear_empties_conversation() {
    let backend = ScriptedChat::replying(Ok(ChatResponse {
        status: "error".to_string(),
        result: json!(null),
        tx_url: None,
    }));
    let mut session = ChatSession::new(backend);

    assert_eq!(session.ask("hello").await, Some(ChatReply::Unprocessed));
    assert_eq!(session.messages().len(), 2);

    session.clear();

    assert!(session.messages().is_empty());
}
