// Wi-Fi endpoints
//
// Reads (address, saved profiles, scan, active network) and the per-profile
// mutations. Profile mutations all take `{"connection_name": ...}`.

use secrecy::SecretString;
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{
    Acknowledgement, ActiveConnection, ActiveNetworkEnvelope, ConnectionNameRequest,
    ConnectionsEnvelope, IpAndMask, NetworksEnvelope, NewApRequest, RememberedConnection,
    WifiNetwork,
};

impl DeviceClient {
    // ── Reads ────────────────────────────────────────────────────────

    /// `GET /wifi_ip_and_mask`
    pub async fn wifi_ip_and_mask(&self) -> Result<IpAndMask, Error> {
        debug!("fetching wifi address");
        self.get("wifi_ip_and_mask").await
    }

    /// Saved credential profiles.
    ///
    /// `GET /remembered_wifi_connections`
    pub async fn remembered_connections(&self) -> Result<Vec<RememberedConnection>, Error> {
        debug!("listing remembered connections");
        let env: ConnectionsEnvelope = self.get("remembered_wifi_connections").await?;
        Ok(env.connections)
    }

    /// Networks currently visible over the air.
    ///
    /// `GET /scan_wifi_networks`
    pub async fn scan_networks(&self) -> Result<Vec<WifiNetwork>, Error> {
        debug!("scanning wifi networks");
        let env: NetworksEnvelope = self.get("scan_wifi_networks").await?;
        Ok(env.networks)
    }

    /// The associated network; inactive when the device reports `{}`.
    ///
    /// `GET /active_wifi_network`
    pub async fn active_connection(&self) -> Result<ActiveConnection, Error> {
        debug!("fetching active connection");
        let env: ActiveNetworkEnvelope = self.get("active_wifi_network").await?;
        Ok(env.network)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Join a network that has no saved profile.
    ///
    /// `POST /connect_to_new_ap` with `{"ssid", "password"}`
    pub async fn connect_to_new_ap(
        &self,
        ssid: &str,
        password: &SecretString,
    ) -> Result<Acknowledgement, Error> {
        debug!(ssid, "connecting to new access point");
        self.post_command("connect_to_new_ap", &NewApRequest { ssid, password })
            .await
    }

    /// `POST /disconnect_from_wifi_connection`
    pub async fn disconnect(&self, connection_name: &str) -> Result<Acknowledgement, Error> {
        debug!(connection_name, "disconnecting");
        self.profile_command("disconnect_from_wifi_connection", connection_name)
            .await
    }

    /// `POST /connect_to_known_wifi_connection`
    pub async fn connect_known(&self, connection_name: &str) -> Result<Acknowledgement, Error> {
        debug!(connection_name, "connecting to known network");
        self.profile_command("connect_to_known_wifi_connection", connection_name)
            .await
    }

    /// Forget a saved profile.
    ///
    /// `POST /delete_known_wifi_connection`
    pub async fn delete_known(&self, connection_name: &str) -> Result<Acknowledgement, Error> {
        debug!(connection_name, "forgetting known network");
        self.profile_command("delete_known_wifi_connection", connection_name)
            .await
    }

    /// `POST /set_autoconnect_on_to_wifi_connection`
    pub async fn set_autoconnect_on(
        &self,
        connection_name: &str,
    ) -> Result<Acknowledgement, Error> {
        debug!(connection_name, "enabling autoconnect");
        self.profile_command("set_autoconnect_on_to_wifi_connection", connection_name)
            .await
    }

    /// `POST /set_autoconnect_off_to_wifi_connection`
    pub async fn set_autoconnect_off(
        &self,
        connection_name: &str,
    ) -> Result<Acknowledgement, Error> {
        debug!(connection_name, "disabling autoconnect");
        self.profile_command("set_autoconnect_off_to_wifi_connection", connection_name)
            .await
    }

    async fn profile_command(
        &self,
        endpoint: &str,
        connection_name: &str,
    ) -> Result<Acknowledgement, Error> {
        self.post_command(endpoint, &ConnectionNameRequest { connection_name })
            .await
    }
}
