use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::WidgetConfig;
use crate::error::WidgetResult;
use crate::model::{SetStatusRequest, StatusUpdate, WidgetSnapshot};
use crate::protocol::StatusBackend;

mod http_client;

mod types;
pub use self::types::*;

/// HTTP transport for the widget API.
pub struct WidgetClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl WidgetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("status-widget")
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(cfg: &WidgetConfig) -> Result<Self> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl StatusBackend for WidgetClient {
    fn query_all(&self, widget_id: &str) -> WidgetResult<WidgetSnapshot> {
        let url = self.url(&Endpoint::Query { widget_id })?;
        let resp = self.client.post(url).send();
        self.decode(resp, "query items")
    }

    fn advance_status(&self, widget_id: &str, item_id: &str) -> WidgetResult<StatusUpdate> {
        let url = self.url(&Endpoint::NextStatus { widget_id, item_id })?;
        let resp = self.client.post(url).send();
        self.decode(resp, "advance status")
    }

    fn set_status(
        &self,
        widget_id: &str,
        item_id: &str,
        status_id: &str,
    ) -> WidgetResult<StatusUpdate> {
        let url = self.url(&Endpoint::SetStatus { widget_id, item_id })?;
        let resp = self
            .client
            .patch(url)
            .json(&SetStatusRequest {
                status_id: status_id.to_string(),
            })
            .send();
        self.decode(resp, "set status")
    }
}
