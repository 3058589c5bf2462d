// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    ChatApi, ChatRequest, ChatResponse, GenerateRequest, GraphResponse, NetworkError,
    CHAT_ENDPOINT, GENERATE_ENDPOINT, START_ENDPOINT,
};

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// JSON-over-HTTP client for the research-tree service.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let parsed = Url::parse(base_url).map_err(|err| NetworkError::InvalidUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder().timeout(timeout).build().map_err(NetworkError::Client)?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post<B, R>(&self, endpoint: &'static str, body: &B) -> Result<R, NetworkError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| NetworkError::Transport { endpoint, source })?;

        let status = response.status();
        let bytes =
            response.bytes().await.map_err(|source| NetworkError::Transport { endpoint, source })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes)
                .chars()
                .take(ERROR_BODY_PREVIEW_CHARS)
                .collect::<String>();
            tracing::warn!(endpoint, status = status.as_u16(), "request rejected");
            return Err(NetworkError::Status { endpoint, status: status.as_u16(), body });
        }

        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::warn!(endpoint, error = %source, "undecodable response");
            NetworkError::Decode { endpoint, source }
        })
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, NetworkError> {
        self.post(CHAT_ENDPOINT, &request).await
    }

    async fn start(&self) -> Result<GraphResponse, NetworkError> {
        self.post(START_ENDPOINT, &serde_json::json!({})).await
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GraphResponse, NetworkError> {
        self.post(GENERATE_ENDPOINT, &request).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::HttpChatApi;
    use crate::api::{ChatApi, ChatRequest, NetworkError};

    /// Serves exactly one request with a canned response and hands back the raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.expect("read");
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0usize);
        body.len() >= content_length
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = HttpChatApi::new("ftp://example.org", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl { .. }), "{err}");

        let err = HttpChatApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl { .. }), "{err}");
    }

    #[test]
    fn joins_endpoints_without_double_slashes() {
        let api = HttpChatApi::new("http://localhost:8000/", Duration::from_secs(1)).expect("api");
        assert_eq!(api.endpoint_url("/chat"), "http://localhost:8000/chat");
    }

    #[tokio::test]
    async fn posts_chat_request_and_decodes_response() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"chat_history":[{"role":"assistant","message":"hi"}],"graph":{"r":{"id":"r","type":"root"}}}"#,
        )
        .await;
        let api = HttpChatApi::new(&url, Duration::from_secs(5)).expect("api");

        let response = api.chat(ChatRequest::user("hello", None)).await.expect("chat");
        assert_eq!(response.assistant_reply(), Some("hi"));
        assert_eq!(response.graph.map(|graph| graph.len()), Some(1));

        let request = server.await.expect("server");
        assert!(request.starts_with("POST /chat "), "{request}");
        assert!(request.contains(r#""message":"hello""#), "{request}");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let (url, server) = serve_once("503 Service Unavailable", r#"{"detail":"busy"}"#).await;
        let api = HttpChatApi::new(&url, Duration::from_secs(5)).expect("api");

        let err = api.start().await.unwrap_err();
        match err {
            NetworkError::Status { endpoint, status, body } => {
                assert_eq!(endpoint, "/start");
                assert_eq!(status, 503);
                assert!(body.contains("busy"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.expect("server");
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_decode_error() {
        let (url, server) = serve_once("200 OK", r#"{"graph": 42}"#).await;
        let api = HttpChatApi::new(&url, Duration::from_secs(5)).expect("api");

        let err = api.start().await.unwrap_err();
        assert!(matches!(err, NetworkError::Decode { endpoint: "/start", .. }), "{err}");
        server.await.expect("server");
    }
}
