use std::time::Duration;

use url::Url;

use crate::RelayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// Hostname (`relay.example.com`) or full `ws://` / `wss://` URL.
    pub server: String,
    pub app_id: String,
    pub channel: String,
    pub site_revision: String,
    pub connect_timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            server: "localhost:9000".to_string(),
            app_id: String::new(),
            channel: String::new(),
            site_revision: "1".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl RelaySettings {
    /// Checks required fields and that the server resolves to a WebSocket URL.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.app_id.trim().is_empty() {
            return Err(RelayError::InvalidSettings("app id is empty".into()));
        }
        if self.channel.trim().is_empty() {
            return Err(RelayError::InvalidSettings("channel id is empty".into()));
        }
        self.connect_url().map(|_| ())
    }

    /// URL the transport dials. Bare hostnames get `wss://`; the app id and
    /// site revision travel as query parameters.
    pub fn connect_url(&self) -> Result<Url, RelayError> {
        let raw = self.server.trim();
        if raw.is_empty() {
            return Err(RelayError::InvalidSettings("server is empty".into()));
        }
        let base = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("wss://{raw}/")
        };
        let mut url = Url::parse(&base)
            .map_err(|err| RelayError::InvalidSettings(format!("server {raw:?}: {err}")))?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(RelayError::InvalidSettings(format!(
                    "unsupported scheme {other}"
                )))
            }
        }
        url.query_pairs_mut()
            .append_pair("appId", &self.app_id)
            .append_pair("siteRevision", &self.site_revision);
        Ok(url)
    }
}
