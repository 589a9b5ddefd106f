use serde::{Deserialize, Serialize};

/// Model used when a request doesn't name one.
pub const DEFAULT_MODEL: &str = "llama3";

/// One turn of a conversation. The role is an open set ("user",
/// "assistant", "system", ...) and is forwarded to the model service
/// uninterpreted, so it stays a plain string rather than an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request from client to the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
