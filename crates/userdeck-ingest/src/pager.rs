//! Cursor-based pagination over the listing endpoint
//!
//! The pager is a small state machine:
//!
//! ```text
//!   Fetching(url) --page with token--> HasToken(token) --> Fetching(url?token=..)
//!   Fetching(url) --page without token--> Done(Exhausted)
//!   Fetching(url) --fetch/decode failure--> Done(Interrupted)
//!   Fetching(url) --token already followed--> Done(TokenCycle)
//! ```
//!
//! A failed page is reported to the caller as an `Err` item and never treated
//! as "no token". Without a token there is no way to reach the following page,
//! so the sequence ends there, but with [`Termination::Interrupted`] rather
//! than [`Termination::Exhausted`].
//!
//! A token is followed at most once per pager, so a service that hands back a
//! token it already issued cannot keep the sequence going forever.

use crate::endpoints::Endpoints;
use crate::error::TransportError;
use crate::transport::Transport;
use futures::Stream;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;
use userdeck_common::ListingPage;

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last page carried no continuation token
    Exhausted,
    /// A page could not be fetched, so the remaining pages are unreachable
    Interrupted,
    /// The service repeated a token that was already followed
    TokenCycle,
}

/// Ids from one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    /// 1-based page number
    pub page: usize,
    pub ids: Vec<i64>,
    /// Whether another page follows
    pub has_more: bool,
}

#[derive(Debug, Clone)]
enum State {
    Fetching(Url),
    HasToken(String),
    Done(Termination),
}

/// Lazily walks the listing pages. Build a new pager to start over.
pub struct Pager {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    state: State,
    pages_fetched: usize,
    pages_failed: usize,
    followed_tokens: HashSet<String>,
}

impl Pager {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        let first = endpoints.listing().clone();
        Self {
            transport,
            endpoints,
            state: State::Fetching(first),
            pages_fetched: 0,
            pages_failed: 0,
            followed_tokens: HashSet::new(),
        }
    }

    /// Fetch the next page. `None` once pagination has terminated.
    pub async fn next_batch(&mut self) -> Option<Result<PageBatch, TransportError>> {
        let url = match &self.state {
            State::Done(_) => return None,
            State::Fetching(url) => url.clone(),
            State::HasToken(token) => self.endpoints.listing_after(token),
        };
        self.state = State::Fetching(url.clone());

        let page = match self.fetch_page(&url).await {
            Ok(page) => page,
            Err(err) => {
                self.pages_failed += 1;
                warn!(
                    url = %url,
                    error = %err,
                    kind = err.kind(),
                    "Listing page fetch failed, remaining pages are unreachable"
                );
                self.state = State::Done(Termination::Interrupted);
                return Some(Err(err));
            },
        };

        self.pages_fetched += 1;
        let has_more = match page.continuation() {
            Some(token) if self.followed_tokens.insert(token.to_string()) => {
                self.state = State::HasToken(token.to_string());
                true
            },
            Some(token) => {
                warn!(
                    url = %url,
                    token,
                    "Listing repeated a continuation token, stopping pagination"
                );
                self.state = State::Done(Termination::TokenCycle);
                false
            },
            None => {
                self.state = State::Done(Termination::Exhausted);
                false
            },
        };

        debug!(
            page = self.pages_fetched,
            ids = page.result.len(),
            has_more,
            "Fetched listing page"
        );

        Some(Ok(PageBatch {
            page: self.pages_fetched,
            ids: page.result,
            has_more,
        }))
    }

    async fn fetch_page(&self, url: &Url) -> Result<ListingPage, TransportError> {
        let body = self.transport.get_json(url).await?;
        serde_json::from_value(body).map_err(|e| TransportError::decode(url, e))
    }

    /// How pagination ended, or `None` while pages remain
    pub fn termination(&self) -> Option<Termination> {
        match self.state {
            State::Done(reason) => Some(reason),
            _ => None,
        }
    }

    /// URL the next call to [`Pager::next_batch`] will request
    pub fn next_url(&self) -> Option<Url> {
        match &self.state {
            State::Fetching(url) => Some(url.clone()),
            State::HasToken(token) => Some(self.endpoints.listing_after(token)),
            State::Done(_) => None,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn pages_failed(&self) -> usize {
        self.pages_failed
    }

    /// Consume the pager as a stream of batches
    pub fn into_stream(self) -> impl Stream<Item = Result<PageBatch, TransportError>> {
        futures::stream::unfold(self, |mut pager| async move {
            pager.next_batch().await.map(|item| (item, pager))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{endpoints, ScriptedTransport, BASE};
    use futures::StreamExt;
    use serde_json::json;

    fn three_pages() -> ScriptedTransport {
        ScriptedTransport::new()
            .respond(format!("{BASE}list/"), json!({ "result": [1, 2], "token": "a" }))
            .respond(
                format!("{BASE}list/?token=a"),
                json!({ "result": [3], "token": "b" }),
            )
            .respond(format!("{BASE}list/?token=b"), json!({ "result": [4] }))
    }

    #[tokio::test]
    async fn test_walks_pages_until_token_absent() {
        let transport = Arc::new(three_pages());
        let mut pager = Pager::new(transport.clone(), endpoints());

        let mut ids = Vec::new();
        let mut pages = 0;
        while let Some(batch) = pager.next_batch().await {
            let batch = batch.unwrap();
            pages += 1;
            assert_eq!(batch.page, pages);
            ids.extend(batch.ids);
        }

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(pages, 3);
        assert_eq!(pager.pages_fetched(), 3);
        assert_eq!(pager.termination(), Some(Termination::Exhausted));
        assert_eq!(pager.next_url(), None);
        assert_eq!(
            transport.requests(),
            vec![
                format!("{BASE}list/"),
                format!("{BASE}list/?token=a"),
                format!("{BASE}list/?token=b"),
            ]
        );

        // Stays terminated without touching the transport again
        assert!(pager.next_batch().await.is_none());
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_has_more_flag() {
        let mut pager = Pager::new(Arc::new(three_pages()), endpoints());
        let first = pager.next_batch().await.unwrap().unwrap();
        assert!(first.has_more);
        assert_eq!(pager.termination(), None);
        assert_eq!(
            pager.next_url().unwrap().as_str(),
            format!("{BASE}list/?token=a")
        );
        pager.next_batch().await.unwrap().unwrap();
        let last = pager.next_batch().await.unwrap().unwrap();
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_failed_page_is_not_treated_as_last_page() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(format!("{BASE}list/"), json!({ "result": [1, 2], "token": "a" }))
                .fail(
                    format!("{BASE}list/?token=a"),
                    TransportError::request(format!("{BASE}list/?token=a"), "connection reset"),
                ),
        );
        let mut pager = Pager::new(transport, endpoints());

        assert_eq!(pager.next_batch().await.unwrap().unwrap().ids, vec![1, 2]);
        let err = pager.next_batch().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), "request");
        assert!(pager.next_batch().await.is_none());

        assert_eq!(pager.termination(), Some(Termination::Interrupted));
        assert_eq!(pager.pages_fetched(), 1);
        assert_eq!(pager.pages_failed(), 1);
    }

    #[tokio::test]
    async fn test_truncated_page_is_a_decode_failure() {
        // Parsed JSON but no "result": must not be mistaken for a final page
        let transport = Arc::new(
            ScriptedTransport::new().respond(format!("{BASE}list/"), json!({ "error": "busy" })),
        );
        let mut pager = Pager::new(transport, endpoints());

        let err = pager.next_batch().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), "decode");
        assert_eq!(pager.termination(), Some(Termination::Interrupted));
    }

    #[tokio::test]
    async fn test_empty_token_ends_pagination() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(format!("{BASE}list/"), json!({ "result": [9], "token": "" })),
        );
        let mut pager = Pager::new(transport, endpoints());

        assert_eq!(pager.next_batch().await.unwrap().unwrap().ids, vec![9]);
        assert!(pager.next_batch().await.is_none());
        assert_eq!(pager.termination(), Some(Termination::Exhausted));
    }

    #[tokio::test]
    async fn test_quoted_ids_do_not_interrupt_pagination() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(format!("{BASE}list/"), json!({ "result": ["1", 2], "token": "a" }))
                .respond(format!("{BASE}list/?token=a"), json!({ "result": [3] })),
        );
        let mut pager = Pager::new(transport, endpoints());

        assert_eq!(pager.next_batch().await.unwrap().unwrap().ids, vec![1, 2]);
        assert_eq!(pager.next_batch().await.unwrap().unwrap().ids, vec![3]);
        assert!(pager.next_batch().await.is_none());
        assert_eq!(pager.termination(), Some(Termination::Exhausted));
    }

    #[tokio::test]
    async fn test_repeated_token_ends_pagination() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(format!("{BASE}list/"), json!({ "result": [1], "token": "a" }))
                .respond(
                    format!("{BASE}list/?token=a"),
                    json!({ "result": [2], "token": "a" }),
                ),
        );
        let mut pager = Pager::new(transport.clone(), endpoints());

        let mut ids = Vec::new();
        while let Some(batch) = pager.next_batch().await {
            ids.extend(batch.unwrap().ids);
        }

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(pager.pages_fetched(), 2);
        assert_eq!(pager.termination(), Some(Termination::TokenCycle));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_longer_token_cycle_is_detected() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(format!("{BASE}list/"), json!({ "result": [1], "token": "a" }))
                .respond(
                    format!("{BASE}list/?token=a"),
                    json!({ "result": [2], "token": "b" }),
                )
                .respond(
                    format!("{BASE}list/?token=b"),
                    json!({ "result": [3], "token": "a" }),
                ),
        );
        let batches: Vec<_> = Pager::new(transport.clone(), endpoints())
            .into_stream()
            .collect()
            .await;

        assert_eq!(batches.len(), 3);
        assert!(!batches[2].as_ref().unwrap().has_more);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_into_stream() {
        let pager = Pager::new(Arc::new(three_pages()), endpoints());
        let batches: Vec<_> = pager.into_stream().collect().await;
        let ids: Vec<i64> = batches
            .into_iter()
            .flat_map(|b| b.unwrap().ids)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
