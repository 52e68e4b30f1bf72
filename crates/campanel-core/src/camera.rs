// ── Camera snapshot ──
//
// The camera tab shows the device behind the wired interface. The Wi-Fi
// address is informational; losing it does not fail the tab.

use campanel_api::{DeviceClient, IpAndMask};
use tracing::{debug, warn};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraSnapshot {
    pub ethernet: IpAndMask,
    /// `None` when the Wi-Fi address could not be read.
    pub wifi: Option<IpAndMask>,
}

impl CameraSnapshot {
    /// The camera's address, if the wired interface has one.
    pub fn camera_ip(&self) -> Option<&str> {
        self.ethernet
            .has_address()
            .then_some(self.ethernet.ip.trim())
    }

    /// Link that opens the camera's own web UI.
    pub fn camera_url(&self) -> Option<String> {
        self.camera_ip().map(|ip| format!("http://{ip}"))
    }
}

pub async fn fetch_camera_snapshot(client: &DeviceClient) -> Result<CameraSnapshot, CoreError> {
    debug!("fetching camera snapshot");
    let (ethernet, wifi) = tokio::join!(client.ethernet_ip_and_mask(), client.wifi_ip_and_mask());

    let wifi = match wifi {
        Ok(addr) => Some(addr),
        Err(e) => {
            warn!(error = %e, "wifi address unavailable");
            None
        }
    };

    Ok(CameraSnapshot {
        ethernet: ethernet?,
        wifi,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DeviceClient {
        DeviceClient::with_client(reqwest::Client::new(), server.uri().parse().unwrap())
    }

    #[test]
    fn blank_ip_means_no_camera() {
        let snapshot = CameraSnapshot {
            ethernet: IpAndMask {
                ip: "  ".into(),
                mask: String::new(),
            },
            wifi: None,
        };
        assert_eq!(snapshot.camera_ip(), None);
        assert_eq!(snapshot.camera_url(), None);
    }

    #[tokio::test]
    async fn wifi_failure_does_not_fail_the_tab() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ethernet_ip_and_mask"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ip": "192.168.0.90", "mask": "24"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wifi_ip_and_mask"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let snapshot = fetch_camera_snapshot(&client(&server)).await.unwrap();
        assert_eq!(snapshot.camera_url().as_deref(), Some("http://192.168.0.90"));
        assert_eq!(snapshot.wifi, None);
    }

    #[tokio::test]
    async fn ethernet_failure_fails_the_tab() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ethernet_ip_and_mask"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "no eth0"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wifi_ip_and_mask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "", "mask": ""})))
            .mount(&server)
            .await;

        let err = fetch_camera_snapshot(&client(&server)).await.unwrap_err();
        assert_eq!(err.message(), "no eth0");
    }
}
