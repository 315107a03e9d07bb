//! WhatsApp bridge adapter.
//!
//! Implements the `wge-core` WhatsappPort over HTTP against the
//! whatsapp-web.js sidecar, and pumps the sidecar's session lifecycle
//! events onto the core event bus via a cursor long-poll.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use wge_core::{
    config::Config,
    domain::{ChatSummary, GroupId, GroupMetadata, InviteCode, InviteInfo},
    errors::Error,
    events::{EventBus, SessionEvent},
    whatsapp::WhatsappPort,
    Result,
};

const EVENT_PUMP_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    poll_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct AcceptResponse {
    group_id: GroupId,
}

#[derive(Debug, Deserialize)]
struct EventBatch {
    cursor: u64,
    #[serde(default)]
    events: Vec<SessionEvent>,
}

impl BridgeClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.bridge_request_timeout)
            .build()
            .map_err(|e| Error::Bridge(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url: cfg.bridge_url.clone(),
            token: cfg.bridge_token.clone(),
            poll_timeout: cfg.bridge_poll_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.authorized(self.http.get(self.url(path)));
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("GET {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Bridge(format!("GET {path} failed: {e}")))?;
        resp.json::<T>()
            .await
            .map_err(|e| Error::Bridge(format!("GET {path}: bad response body: {e}")))
    }

    async fn post_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.authorized(self.http.post(self.url(path)));
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Bridge(format!("POST {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Bridge(format!("POST {path} failed: {e}")))?;
        resp.json::<T>()
            .await
            .map_err(|e| Error::Bridge(format!("POST {path}: bad response body: {e}")))
    }

    /// One long-poll round of the sidecar's event feed.
    async fn poll_events(&self, cursor: u64) -> Result<EventBatch> {
        let wait = self.poll_timeout.as_secs();
        self.get_json(&format!("/session/events?cursor={cursor}&wait_secs={wait}"))
            .await
    }
}

#[async_trait]
impl WhatsappPort for BridgeClient {
    async fn get_invite_info(&self, code: &InviteCode) -> Result<InviteInfo> {
        self.get_json(&format!("/invite/{code}")).await
    }

    async fn accept_invite(&self, code: &InviteCode) -> Result<GroupId> {
        let resp: AcceptResponse = self.post_json(&format!("/invite/{code}/accept")).await?;
        Ok(resp.group_id)
    }

    async fn get_group_metadata(&self, id: &GroupId) -> Result<GroupMetadata> {
        self.get_json(&format!("/group/{id}")).await
    }

    async fn get_chats(&self) -> Result<Vec<ChatSummary>> {
        self.get_json("/chats").await
    }
}

/// Forward sidecar lifecycle events onto the bus, forever.
///
/// Poll failures are logged and retried after a short delay; the cursor
/// only advances on a successful batch, so no event is skipped over an
/// error.
pub async fn run_event_pump(client: BridgeClient, bus: EventBus) {
    let mut cursor = 0u64;
    loop {
        match client.poll_events(cursor).await {
            Ok(batch) => {
                for event in batch.events {
                    debug!(event = event.name(), "bridge session event");
                    bus.publish(event);
                }
                cursor = batch.cursor;
            }
            Err(e) => {
                warn!(error = %e, "event poll failed, retrying");
                sleep(EVENT_PUMP_RETRY_DELAY).await;
            }
        }
    }
}
