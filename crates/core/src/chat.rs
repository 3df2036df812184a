use crate::format::{extract_links, format_balance};
use crate::types::{ChatMessage, ConversationLog};
use launchpad_providers::{ChatBackend, ChatResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

pub const UNPROCESSED_MESSAGE: &str =
    "I apologize, but I couldn't process your request properly. Please try again.";
pub const FAILED_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again later.";

/// An agent reply, sorted by how it should be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text { content: String, links: Vec<String> },
    Balance(f64),
    /// A protocol description object (has `protocol_name`).
    Protocol(Value),
    /// The agent answered but did not report success.
    Unprocessed,
    /// The request itself failed.
    Failed,
}

impl ChatReply {
    pub fn classify(response: &ChatResponse) -> Self {
        if !response.is_success() {
            return ChatReply::Unprocessed;
        }

        let result = &response.result;
        let text = match result {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        };

        if is_decimal(&text) {
            if let Ok(balance) = text.parse::<f64>() {
                return ChatReply::Balance(balance);
            }
        }

        if is_protocol(result) {
            return ChatReply::Protocol(result.clone());
        }

        let mut links = Vec::new();
        if let Some(tx_url) = &response.tx_url {
            links.push(tx_url.clone());
        } else if text.starts_with('{') {
            if let Ok(parsed) = serde_json::from_str::<Value>(&text) {
                if is_protocol(&parsed) {
                    return ChatReply::Protocol(parsed);
                }
            }
        }

        let (content, found) = extract_links(&text);
        for link in found {
            if !links.contains(&link) {
                links.push(link);
            }
        }

        ChatReply::Text { content, links }
    }

    fn to_message(&self) -> ChatMessage {
        match self {
            ChatReply::Text { content, links } => {
                ChatMessage::bot_with_links(content.clone(), links.clone())
            }
            ChatReply::Balance(balance) => ChatMessage::bot(format_balance(*balance)),
            ChatReply::Protocol(value) => ChatMessage::bot(value.to_string()),
            ChatReply::Unprocessed => ChatMessage::bot(UNPROCESSED_MESSAGE),
            ChatReply::Failed => ChatMessage::bot(FAILED_MESSAGE),
        }
    }
}

fn is_decimal(text: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for ch in text.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn is_protocol(value: &Value) -> bool {
    value.get("protocol_name").is_some()
}

/// Free-form conversation with the loaded agent.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    log: ConversationLog,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            log: ConversationLog::new(),
        }
    }

    /// Sends `prompt` and records both sides. Blank prompts are ignored.
    pub async fn ask(&mut self, prompt: &str) -> Option<ChatReply> {
        if prompt.trim().is_empty() {
            return None;
        }

        self.log.push(ChatMessage::user(prompt));

        let reply = match self.backend.chat(prompt).await {
            Ok(response) => ChatReply::classify(&response),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                ChatReply::Failed
            }
        };

        self.log.push(reply.to_message());
        Some(reply)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn messages(&self) -> &ConversationLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success(result: Value) -> ChatResponse {
        ChatResponse {
            status: "success".to_string(),
            result,
            tx_url: None,
        }
    }

    #[test]
    fn test_balance_reply() {
        assert_eq!(
            ChatReply::classify(&success(json!("12.5"))),
            ChatReply::Balance(12.5)
        );
        assert_eq!(
            ChatReply::classify(&success(json!(3))),
            ChatReply::Balance(3.0)
        );
    }

    #[test]
    fn test_protocol_reply() {
        let protocol = json!({"protocol_name": "Lido", "apy": "3.2%"});
        assert_eq!(
            ChatReply::classify(&success(protocol.clone())),
            ChatReply::Protocol(protocol.clone())
        );
        assert_eq!(
            ChatReply::classify(&success(json!(protocol.to_string()))),
            ChatReply::Protocol(protocol)
        );
    }

    #[test]
    fn test_tx_url_and_inline_links_are_merged() {
        let response = ChatResponse {
            status: "success".to_string(),
            result: json!("Sent! https://scan.io/tx/1"),
            tx_url: Some("https://scan.io/tx/1".to_string()),
        };
        assert_eq!(
            ChatReply::classify(&response),
            ChatReply::Text {
                content: "Sent! ".to_string(),
                links: vec!["https://scan.io/tx/1".to_string()],
            }
        );
    }

    #[test]
    fn test_unsuccessful_status() {
        let response = ChatResponse {
            status: "error".to_string(),
            result: json!("whatever"),
            tx_url: None,
        };
        assert_eq!(ChatReply::classify(&response), ChatReply::Unprocessed);
    }

    #[test]
    fn test_is_decimal() {
        assert!(is_decimal("10"));
        assert!(is_decimal("0.25"));
        assert!(is_decimal(".5"));
        assert!(!is_decimal("."));
        assert!(!is_decimal(""));
        assert!(!is_decimal("1.2.3"));
        assert!(!is_decimal("-1"));
    }
}
