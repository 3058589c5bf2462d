// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatApi, ChatRequest, ChatResponse, GenerateRequest, GraphResponse, NetworkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recorded {
    Chat(ChatRequest),
    Start,
    Generate(GenerateRequest),
}

/// Scripted [`ChatApi`]: answers calls from queues and records what it was asked.
#[derive(Default)]
pub(crate) struct FakeApi {
    chat: Mutex<VecDeque<Result<ChatResponse, NetworkError>>>,
    graph: Mutex<VecDeque<Result<GraphResponse, NetworkError>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl FakeApi {
    pub(crate) fn with_chat(self, result: Result<ChatResponse, NetworkError>) -> Self {
        self.chat.lock().expect("chat queue").push_back(result);
        self
    }

    pub(crate) fn with_graph(self, result: Result<GraphResponse, NetworkError>) -> Self {
        self.graph.lock().expect("graph queue").push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().expect("calls").clone()
    }
}

pub(crate) fn unavailable(endpoint: &'static str) -> NetworkError {
    NetworkError::Status { endpoint, status: 503, body: "unavailable".to_owned() }
}

#[async_trait]
impl ChatApi for FakeApi {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, NetworkError> {
        self.calls.lock().expect("calls").push(Recorded::Chat(request));
        self.chat
            .lock()
            .expect("chat queue")
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("/chat")))
    }

    async fn start(&self) -> Result<GraphResponse, NetworkError> {
        self.calls.lock().expect("calls").push(Recorded::Start);
        self.graph
            .lock()
            .expect("graph queue")
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("/start")))
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GraphResponse, NetworkError> {
        self.calls.lock().expect("calls").push(Recorded::Generate(request));
        self.graph
            .lock()
            .expect("graph queue")
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("/generate")))
    }
}
