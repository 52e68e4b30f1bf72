// Device API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, status normalization, and
// body decoding. The endpoint groups (ethernet, system, wifi) are inherent
// methods implemented in separate files so this module stays focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, ErrorPayload};
use crate::models::Acknowledgement;
use crate::transport::TransportConfig;

/// HTTP client for one appliance.
///
/// Cheap to clone: the inner `reqwest::Client` is reference-counted, so
/// background tasks take their own copy.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a client for the appliance at `base_url`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// The appliance base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host part of the base URL, used to build links to the device.
    pub fn host(&self) -> Option<&str> {
        self.base_url.host_str()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint name against the base URL.
    pub(crate) fn endpoint(&self, name: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(name.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET an endpoint and decode its JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, Error> {
        let url = self.endpoint(name)?;
        debug!("GET {url}");
        let result = async {
            let body = self.execute(self.http.get(url.clone())).await?;
            decode(&body)
        }
        .await;
        log_failure("GET", &url, result)
    }

    /// POST a JSON body to an endpoint and decode the response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        name: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.endpoint(name)?;
        debug!("POST {url}");
        let result = async {
            let text = self.execute(self.http.post(url.clone()).json(body)).await?;
            decode(&text)
        }
        .await;
        log_failure("POST", &url, result)
    }

    /// POST a JSON body to a mutating endpoint and read its acknowledgement.
    pub(crate) async fn post_command(
        &self,
        name: &str,
        body: &impl Serialize,
    ) -> Result<Acknowledgement, Error> {
        let url = self.endpoint(name)?;
        debug!("POST {url}");
        let result = async {
            let text = self.execute(self.http.post(url.clone()).json(body)).await?;
            acknowledge(&text)
        }
        .await;
        log_failure("POST", &url, result)
    }

    /// POST without a body (reboot, shutdown).
    pub(crate) async fn post_empty(&self, name: &str) -> Result<Acknowledgement, Error> {
        let url = self.endpoint(name)?;
        debug!("POST {url}");
        let result = async {
            let text = self.execute(self.http.post(url.clone())).await?;
            acknowledge(&text)
        }
        .await;
        log_failure("POST", &url, result)
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// Non-2xx responses become `Error::Status`, carrying the device's
    /// `{"error": ...}` message when the body has one.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorPayload>(&body)
            .map(|p| p.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
            });

        Err(Error::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

fn acknowledge(body: &str) -> Result<Acknowledgement, Error> {
    Acknowledgement::from_body(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

fn log_failure<T>(method: &str, url: &Url, result: Result<T, Error>) -> Result<T, Error> {
    if let Err(ref e) = result {
        warn!(%method, %url, error = %e, "device request failed");
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> DeviceClient {
        DeviceClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoints_join_onto_bare_host() {
        let c = client("http://10.0.0.5:8000");
        assert_eq!(
            c.endpoint("scan_wifi_networks").unwrap().as_str(),
            "http://10.0.0.5:8000/scan_wifi_networks"
        );
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let c = client("http://device.local/panel");
        assert_eq!(c.base_url().as_str(), "http://device.local/panel/");
        assert_eq!(
            c.endpoint("/reboot").unwrap().as_str(),
            "http://device.local/panel/reboot"
        );
        assert_eq!(c.host(), Some("device.local"));
    }
}
