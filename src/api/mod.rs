// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire contract of the research-tree service and the client seam used by the chat controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{NodeId, RawGraph, Role};

#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use http::HttpChatApi;

pub const CHAT_ENDPOINT: &str = "/chat";
pub const START_ENDPOINT: &str = "/start";
pub const GENERATE_ENDPOINT: &str = "/generate";

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub role: Role,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
}

impl ChatRequest {
    pub fn user(message: impl Into<String>, node_id: Option<NodeId>) -> Self {
        Self { role: Role::User, message: message.into(), node_id }
    }
}

/// One entry of the server-side chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(alias = "content")]
    pub message: String,
}

impl HistoryEntry {
    pub fn role(&self) -> Option<Role> {
        match self.role.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub chat_history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<RawGraph>,
}

impl ChatResponse {
    /// The reply to show locally: the last history entry, if it was written by the assistant.
    pub fn assistant_reply(&self) -> Option<&str> {
        self.chat_history
            .last()
            .filter(|entry| entry.role() == Some(Role::Assistant))
            .map(|entry| entry.message.as_str())
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub active_node_uuid: NodeId,
}

/// Response of `POST /start` and `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub graph: RawGraph,
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid api url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}: {body}")]
    Status { endpoint: &'static str, status: u16, body: String },
    #[error("could not decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The remote research-tree service, as seen by the chat controller.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, NetworkError>;

    async fn start(&self) -> Result<GraphResponse, NetworkError>;

    async fn generate(&self, request: GenerateRequest) -> Result<GraphResponse, NetworkError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatRequest, ChatResponse, GenerateRequest};
    use crate::model::NodeId;

    #[test]
    fn chat_request_omits_missing_node_id() {
        let request = ChatRequest::user("hello", None);
        assert_eq!(
            serde_json::to_value(&request).expect("json"),
            serde_json::json!({"role": "user", "message": "hello"})
        );

        let request = ChatRequest::user("hello", Some(NodeId::new("7").expect("node id")));
        assert_eq!(serde_json::to_value(&request).expect("json")["node_id"], "7");
    }

    #[test]
    fn generate_request_uses_active_node_uuid() {
        let request = GenerateRequest { active_node_uuid: NodeId::new("n-1").expect("node id") };
        assert_eq!(
            serde_json::to_value(&request).expect("json"),
            serde_json::json!({"active_node_uuid": "n-1"})
        );
    }

    #[test]
    fn assistant_reply_is_last_entry_only_when_from_assistant() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"chat_history": [
                {"role": "user", "message": "q"},
                {"role": "assistant", "message": "a"}
            ]}"#,
        )
        .expect("response");
        assert_eq!(response.assistant_reply(), Some("a"));
        assert!(response.graph.is_none());

        let response: ChatResponse = serde_json::from_str(
            r#"{"chat_history": [
                {"role": "assistant", "message": "a"},
                {"role": "user", "content": "q"}
            ], "graph": {"r": {"id": "r", "type": "root"}}}"#,
        )
        .expect("response");
        assert_eq!(response.assistant_reply(), None);
        assert_eq!(response.graph.map(|graph| graph.len()), Some(1));

        let empty: ChatResponse = serde_json::from_str("{}").expect("response");
        assert_eq!(empty.assistant_reply(), None);
    }
}
