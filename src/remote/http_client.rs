use serde::de::DeserializeOwned;

use super::*;
use crate::error::WidgetError;
use crate::protocol::Envelope;

impl WidgetClient {
    pub(super) fn url(&self, endpoint: &Endpoint<'_>) -> WidgetResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| WidgetError::Transport(format!("bad base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| WidgetError::Transport(format!("base url {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    /// Decode the body as an envelope before looking at the HTTP status, so an
    /// `ok=false` body is always a typed error whatever the status code.
    pub(super) fn decode<T: DeserializeOwned>(
        &self,
        resp: reqwest::Result<reqwest::blocking::Response>,
        label: &str,
    ) -> WidgetResult<T> {
        let resp = resp.map_err(|e| WidgetError::Transport(format!("{}: {}", label, e)))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .map_err(|e| WidgetError::Transport(format!("{}: read body: {}", label, e)))?;

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(env) => {
                let res = env.into_result();
                if let Err(err) = &res {
                    tracing::debug!(%label, %status, code = err.code(), "api returned not ok");
                }
                res
            }
            Err(e) => Err(WidgetError::Transport(format!(
                "{}: HTTP {}: malformed envelope: {}",
                label, status, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_keep_ids_as_single_segments() {
        let client = WidgetClient::new("http://127.0.0.1:5055/", std::time::Duration::from_secs(1))
            .expect("client");
        let url = client
            .url(&Endpoint::NextStatus {
                widget_id: "w_1",
                item_id: "a/b",
            })
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5055/v1/widgets/w_1/items/a%2Fb/status/next"
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let client = WidgetClient::new("http://host/api", std::time::Duration::from_secs(1))
            .expect("client");
        let url = client
            .url(&Endpoint::Query { widget_id: "w_1" })
            .expect("url");
        assert_eq!(url.as_str(), "http://host/api/v1/widgets/w_1/items/query");
    }
}
