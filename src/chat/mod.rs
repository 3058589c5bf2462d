// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Chat controller: turns user intents into API requests and applies the outcomes to the store.
//!
//! Every interaction is split in three steps so the UI thread never waits on the network:
//! `begin_*` validates and raises the loading flag, [`ChatController::execute`] performs the call
//! (usually on a tokio task), and [`finish`] applies the completion back on the UI thread.

use std::sync::Arc;

use crate::api::{
    ChatApi, ChatRequest, ChatResponse, GenerateRequest, GraphResponse, NetworkError,
};
use crate::layout::GraphLayout;
use crate::model::{ChatMessage, NodeId};
use crate::store::{StoreError, ViewStore};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("node {node_id} is not part of the current graph")]
    UnknownNode { node_id: NodeId },
}

/// A request that has passed local validation and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Chat(ChatRequest),
    Start,
    Generate(GenerateRequest),
}

impl Request {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Chat(_) => "chat",
            Self::Start => "start",
            Self::Generate(_) => "generate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Chat(ChatResponse),
    Graph(GraphResponse),
}

/// The outcome of one API call, paired with the request that produced it.
#[derive(Debug)]
pub struct Completion {
    request: Request,
    result: Result<Response, NetworkError>,
}

impl Completion {
    pub fn new(request: Request, result: Result<Response, NetworkError>) -> Self {
        Self { request, result }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Clone)]
pub struct ChatController {
    api: Arc<dyn ChatApi>,
}

impl ChatController {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> Arc<dyn ChatApi> {
        Arc::clone(&self.api)
    }

    /// Performs the network call for `request`. Never touches view state.
    pub async fn execute(&self, request: Request) -> Completion {
        execute(self.api.as_ref(), request).await
    }

    /// Sends `input` as a user message and applies the reply.
    ///
    /// Blank input is ignored without a network call.
    pub async fn send<L: GraphLayout>(
        &self,
        store: &mut ViewStore<L>,
        input: &str,
    ) -> Result<(), ChatError> {
        let Some(request) = begin_send(store, input) else {
            return Ok(());
        };
        let completion = self.execute(request).await;
        finish(store, completion)
    }

    /// Fetches the initial graph.
    pub async fn start<L: GraphLayout>(&self, store: &mut ViewStore<L>) -> Result<(), ChatError> {
        let request = begin_start(store);
        let completion = self.execute(request).await;
        finish(store, completion)
    }

    /// Asks the service to grow the tree below `node_id`.
    pub async fn expand<L: GraphLayout>(
        &self,
        store: &mut ViewStore<L>,
        node_id: &NodeId,
    ) -> Result<(), ChatError> {
        let request = begin_expand(store, node_id)?;
        let completion = self.execute(request).await;
        finish(store, completion)
    }
}

pub async fn execute(api: &dyn ChatApi, request: Request) -> Completion {
    tracing::debug!(request = request.label(), "sending request");
    let result = match &request {
        Request::Chat(chat) => api.chat(chat.clone()).await.map(Response::Chat),
        Request::Start => api.start().await.map(Response::Graph),
        Request::Generate(generate) => api.generate(generate.clone()).await.map(Response::Graph),
    };
    Completion::new(request, result)
}

/// Validates `input` and raises the loading flag. `None` means there is nothing to send.
pub fn begin_send<L: GraphLayout>(store: &mut ViewStore<L>, input: &str) -> Option<Request> {
    let message = input.trim();
    if message.is_empty() {
        return None;
    }

    let node_id = store.state().selected_node_id().cloned();
    store.set_global_loading(true);
    Some(Request::Chat(ChatRequest::user(message, node_id)))
}

pub fn begin_start<L: GraphLayout>(store: &mut ViewStore<L>) -> Request {
    store.set_global_loading(true);
    Request::Start
}

pub fn begin_expand<L: GraphLayout>(
    store: &mut ViewStore<L>,
    node_id: &NodeId,
) -> Result<Request, ChatError> {
    if store.state().node(node_id.as_str()).is_none() {
        return Err(ChatError::UnknownNode { node_id: node_id.clone() });
    }
    store.set_global_loading(true);
    Ok(Request::Generate(GenerateRequest { active_node_uuid: node_id.clone() }))
}

/// Applies a completed call to the store. The loading flag is cleared on every outcome.
///
/// A successful chat call appends the user message, then the assistant reply when the last
/// history entry is from the assistant, replaces the graph when one was returned, and clears the
/// input buffer if it still holds the sent message. A failed call appends nothing and leaves the
/// input buffer as it was.
pub fn finish<L: GraphLayout>(
    store: &mut ViewStore<L>,
    completion: Completion,
) -> Result<(), ChatError> {
    let Completion { request, result } = completion;
    let outcome = apply(store, request, result);
    store.set_global_loading(false);
    if let Err(err) = &outcome {
        tracing::warn!(error = %err, "request failed");
    }
    outcome
}

fn apply<L: GraphLayout>(
    store: &mut ViewStore<L>,
    request: Request,
    result: Result<Response, NetworkError>,
) -> Result<(), ChatError> {
    let response = result?;
    match (request, response) {
        (Request::Chat(request), Response::Chat(response)) => {
            // Text typed while the call was in flight stays.
            if store.state().input().trim() == request.message {
                store.set_input("");
            }
            store.append_message(ChatMessage::user(request.message));
            if let Some(reply) = response.assistant_reply() {
                store.append_message(ChatMessage::assistant(reply));
            }
            if let Some(graph) = response.graph {
                store.set_graph(graph)?;
            }
            Ok(())
        }
        (_, Response::Graph(response)) => {
            store.set_graph(response.graph)?;
            Ok(())
        }
        (request, Response::Chat(response)) => {
            tracing::debug!(request = request.label(), "chat response for non-chat request");
            if let Some(graph) = response.graph {
                store.set_graph(graph)?;
            }
            Ok(())
        }
    }
}
