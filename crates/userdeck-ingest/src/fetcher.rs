//! Detail record fetcher

use crate::endpoints::Endpoints;
use crate::error::TransportError;
use crate::transport::Transport;
use std::sync::Arc;
use userdeck_common::RawUserRecord;

/// Resolves a record id to its raw detail record. Faults are returned, not
/// logged; the caller decides how to report a skipped record.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn fetch(&self, id: i64) -> Result<RawUserRecord, TransportError> {
        let url = self
            .endpoints
            .detail(id)
            .map_err(|e| TransportError::request(format!("detail/{}", id), e))?;

        let body = self.transport.get_json(&url).await?;
        serde_json::from_value(body).map_err(|e| TransportError::decode(&url, e))
    }
}
