// ── Wi-Fi snapshot ──
//
// The three Wi-Fi reads (saved profiles, active network, scan) are issued
// together and joined. A failed read is reported by name; it is never
// replaced with an empty list.

use std::fmt;

use campanel_api::{ActiveConnection, DeviceClient, RememberedConnection, WifiNetwork};
use strum::Display;
use tracing::{debug, warn};

use crate::error::CoreError;

/// How one scanned network relates to the device's saved profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowState {
    /// Currently associated.
    Active,
    /// Has a saved profile with the same name; connects without a password.
    Known,
    /// No saved profile; connecting needs a password.
    Unknown,
}

/// Classify a scanned network.
///
/// `ACTIVE` wins over a name match. Names are compared byte for byte.
pub fn classify(network: &WifiNetwork, remembered: &[RememberedConnection]) -> RowState {
    if network.active.is_yes() {
        RowState::Active
    } else if remembered.iter().any(|c| c.name == network.ssid) {
        RowState::Known
    } else {
        RowState::Unknown
    }
}

/// Everything the Wi-Fi panel renders from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiSnapshot {
    pub remembered: Vec<RememberedConnection>,
    pub active: ActiveConnection,
    pub available: Vec<WifiNetwork>,
}

impl WifiSnapshot {
    pub fn remembered(&self, name: &str) -> Option<&RememberedConnection> {
        self.remembered.iter().find(|c| c.name == name)
    }
}

/// One of the reads that make up a [`WifiSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum WifiResource {
    #[strum(to_string = "Remembered connections")]
    Remembered,
    #[strum(to_string = "Active connection")]
    Active,
    #[strum(to_string = "Network scan")]
    Scan,
}

/// At least one Wi-Fi read failed. Lists every failure, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotError {
    pub failures: Vec<(WifiResource, CoreError)>,
}

impl SnapshotError {
    pub fn failed(&self, resource: WifiResource) -> Option<&CoreError> {
        self.failures
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, e)| e)
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|(resource, err)| format!("{resource}: {err}"))
            .collect();
        write!(f, "Wi-Fi data unavailable ({})", parts.join("; "))
    }
}

impl std::error::Error for SnapshotError {}

/// Fetch saved profiles, the active network, and a scan concurrently.
pub async fn fetch_wifi_snapshot(client: &DeviceClient) -> Result<WifiSnapshot, SnapshotError> {
    debug!("fetching wifi snapshot");
    let (remembered, active, available) = tokio::join!(
        client.remembered_connections(),
        client.active_connection(),
        client.scan_networks(),
    );

    let mut failures = Vec::new();
    let remembered = keep(WifiResource::Remembered, remembered, &mut failures);
    let active = keep(WifiResource::Active, active, &mut failures);
    let available = keep(WifiResource::Scan, available, &mut failures);

    match (remembered, active, available) {
        (Some(remembered), Some(active), Some(available)) => {
            Ok(WifiSnapshot {
                remembered,
                active,
                available,
            })
        }
        _ => {
            warn!(failed = failures.len(), "wifi snapshot incomplete");
            Err(SnapshotError { failures })
        }
    }
}

fn keep<T>(
    resource: WifiResource,
    result: Result<T, campanel_api::Error>,
    failures: &mut Vec<(WifiResource, CoreError)>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            failures.push((resource, e.into()));
            None
        }
    }
}
