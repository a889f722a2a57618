//! Correction endpoint wire types.

use serde::{Deserialize, Serialize};

/// Chat request body.
#[derive(Debug, Serialize)]
pub struct ApiRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl ApiMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One newline-delimited record of the streamed response.
#[derive(Debug, Deserialize)]
pub struct StreamFragment {
    #[serde(default)]
    pub message: Option<FragmentMessage>,
}

/// Some deployments send the fragment as a bare string, others wrap it in a
/// chat message object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FragmentMessage {
    Text(String),
    Chat { content: String },
}

impl StreamFragment {
    pub fn text(&self) -> &str {
        match &self.message {
            Some(FragmentMessage::Text(text)) => text,
            Some(FragmentMessage::Chat { content }) => content,
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_serialization() {
        let request = ApiRequest {
            model: "grammar-small".to_string(),
            messages: vec![ApiMessage::user("fix: I has a apple")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "grammar-small");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "fix: I has a apple");
    }

    #[test]
    fn test_fragment_string_message() {
        let fragment: StreamFragment = serde_json::from_str(r#"{"message":"I have"}"#).unwrap();
        assert_eq!(fragment.text(), "I have");
    }

    #[test]
    fn test_fragment_chat_message() {
        let fragment: StreamFragment =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":" an"}}"#).unwrap();
        assert_eq!(fragment.text(), " an");
    }

    #[test]
    fn test_fragment_without_message() {
        let fragment: StreamFragment = serde_json::from_str(r#"{"done":false}"#).unwrap();
        assert_eq!(fragment.text(), "");
    }
}
