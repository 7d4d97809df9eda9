//! Shared helpers for unit tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::endpoints::Endpoints;
use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

pub const BASE: &str = "http://listing.test/sample/";

pub fn endpoints() -> Endpoints {
    Endpoints::new(Url::parse(BASE).unwrap()).unwrap()
}

/// Transport answering from a fixed URL -> response table. Unknown URLs get
/// a 404. Every request is recorded in order.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Result<Value, TransportError>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: impl ToString, body: Value) -> Self {
        self.responses.insert(url.to_string(), Ok(body));
        self
    }

    pub fn fail(mut self, url: impl ToString, err: TransportError) -> Self {
        self.responses.insert(url.to_string(), Err(err));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &Url) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            })
    }
}
