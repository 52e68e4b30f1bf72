// ── Command API ──
//
// Every write the panel can make is a `Command`. The dispatcher runs one,
// then re-reads the whole tab; commands never patch panel state directly.

use std::net::Ipv4Addr;

use campanel_api::{DeviceClient, IpAndMask, YesNo};
use secrecy::SecretString;
use tracing::info;

use crate::error::CoreError;

/// All mutating operations against the device.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Wi-Fi ────────────────────────────────────────────────────────
    ConnectKnown {
        name: String,
    },
    ConnectNew {
        ssid: String,
        password: SecretString,
    },
    Disconnect {
        name: String,
    },
    Forget {
        name: String,
    },
    /// Flip autoconnect. `current` is the state shown when the user acted;
    /// it selects the on or off endpoint.
    ToggleAutoconnect {
        name: String,
        current: YesNo,
    },

    // ── Ethernet ─────────────────────────────────────────────────────
    SetEthernetAddress {
        ip: Ipv4Addr,
        prefix: u8,
    },

    // ── System ───────────────────────────────────────────────────────
    Reboot,
    Shutdown,
}

/// What the device sent back for a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A free-form acknowledgement, possibly with a message.
    Ok(Option<String>),
    /// The address the device applied.
    Address(IpAndMask),
}

impl Command {
    /// Build an ethernet address change from user text.
    ///
    /// The mask may be a prefix length (`24`) or a dotted mask
    /// (`255.255.255.0`); it is sent as a prefix length.
    pub fn set_ethernet(ip: &str, mask: &str) -> Result<Self, CoreError> {
        let ip: Ipv4Addr = ip
            .trim()
            .parse()
            .map_err(|_| CoreError::validation(format!("'{}' is not an IPv4 address", ip.trim())))?;
        let prefix = parse_prefix(mask.trim())?;
        Ok(Self::SetEthernetAddress { ip, prefix })
    }

    /// Commands the user must confirm before they run.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::Reboot | Self::Shutdown)
    }

    /// Short present-tense description for status lines.
    pub fn describe(&self) -> String {
        match self {
            Self::ConnectKnown { name } => format!("Connecting to {name}"),
            Self::ConnectNew { ssid, .. } => format!("Joining {ssid}"),
            Self::Disconnect { name } => format!("Disconnecting from {name}"),
            Self::Forget { name } => format!("Forgetting {name}"),
            Self::ToggleAutoconnect { name, current } => {
                let verb = if current.is_yes() { "Disabling" } else { "Enabling" };
                format!("{verb} autoconnect for {name}")
            }
            Self::SetEthernetAddress { ip, prefix } => format!("Setting ethernet to {ip}/{prefix}"),
            Self::Reboot => "Rebooting device".into(),
            Self::Shutdown => "Shutting down device".into(),
        }
    }

    /// Run the command against the device.
    pub async fn execute(&self, client: &DeviceClient) -> Result<CommandResult, CoreError> {
        info!(command = %self.describe(), "executing command");
        let ack = match self {
            Self::ConnectKnown { name } => client.connect_known(name).await?,
            Self::ConnectNew { ssid, password } => client.connect_to_new_ap(ssid, password).await?,
            Self::Disconnect { name } => client.disconnect(name).await?,
            Self::Forget { name } => client.delete_known(name).await?,
            Self::ToggleAutoconnect { name, current } => {
                if current.is_yes() {
                    client.set_autoconnect_off(name).await?
                } else {
                    client.set_autoconnect_on(name).await?
                }
            }
            Self::SetEthernetAddress { ip, prefix } => {
                let applied = client
                    .set_ethernet_ip_and_mask(&ip.to_string(), &prefix.to_string())
                    .await?;
                return Ok(CommandResult::Address(applied));
            }
            Self::Reboot => client.reboot().await?,
            Self::Shutdown => client.shutdown().await?,
        };
        Ok(CommandResult::Ok(ack.message))
    }
}

fn parse_prefix(mask: &str) -> Result<u8, CoreError> {
    if let Ok(prefix) = mask.parse::<u8>() {
        return if prefix <= 32 {
            Ok(prefix)
        } else {
            Err(CoreError::validation(format!(
                "prefix length {prefix} is out of range (0-32)"
            )))
        };
    }

    let dotted: Ipv4Addr = mask
        .parse()
        .map_err(|_| CoreError::validation(format!("'{mask}' is not a netmask")))?;
    let bits = u32::from(dotted);
    // Contiguous ones followed by zeros only.
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(CoreError::validation(format!(
            "'{mask}' is not a contiguous netmask"
        )));
    }
    u8::try_from(bits.leading_ones())
        .map_err(|_| CoreError::validation(format!("'{mask}' is not a netmask")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::view::render_wifi;
    use crate::wifi::{WifiSnapshot, fetch_wifi_snapshot};
    use crate::view::WifiUiState;

    fn client(server: &MockServer) -> DeviceClient {
        DeviceClient::with_client(reqwest::Client::new(), server.uri().parse().unwrap())
    }

    #[test]
    fn ethernet_accepts_prefix_or_dotted_mask() {
        let cmd = Command::set_ethernet(" 10.1.2.3 ", "24").unwrap();
        assert!(matches!(
            cmd,
            Command::SetEthernetAddress { ip, prefix: 24 } if ip == Ipv4Addr::new(10, 1, 2, 3)
        ));

        let cmd = Command::set_ethernet("10.1.2.3", "255.255.240.0").unwrap();
        assert!(matches!(cmd, Command::SetEthernetAddress { prefix: 20, .. }));
    }

    #[test]
    fn ethernet_rejects_bad_input() {
        assert!(matches!(
            Command::set_ethernet("10.1.2", "24"),
            Err(CoreError::Validation { .. })
        ));
        assert!(Command::set_ethernet("10.1.2.3", "33").is_err());
        assert!(Command::set_ethernet("10.1.2.3", "255.0.255.0").is_err());
        assert!(Command::set_ethernet("10.1.2.3", "").is_err());
    }

    #[test]
    fn only_power_commands_need_confirmation() {
        assert!(Command::Reboot.needs_confirmation());
        assert!(Command::Shutdown.needs_confirmation());
        assert!(!Command::Forget { name: "x".into() }.needs_confirmation());
    }

    /// A tiny stateful device: autoconnect is whatever the last on/off call set.
    async fn mount_autoconnect(server: &MockServer, initial: &str, after_off: &str) {
        let listing = |state: &str| {
            ResponseTemplate::new(200)
                .set_body_json(json!({"connections": [{"name": "Home", "autoconnect": state}]}))
        };
        Mock::given(method("GET"))
            .and(path("/remembered_wifi_connections"))
            .respond_with(listing(initial))
            .up_to_n_times(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/remembered_wifi_connections"))
            .respond_with(listing(after_off))
            .up_to_n_times(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/remembered_wifi_connections"))
            .respond_with(listing(initial))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/active_wifi_network"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"network": {}})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/scan_wifi_networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
            .mount(server)
            .await;
    }

    fn autoconnect_label(snapshot: &WifiSnapshot) -> String {
        let view = render_wifi(snapshot, &WifiUiState::default());
        view.known().unwrap().rows[0].autoconnect_label.clone()
    }

    #[tokio::test]
    async fn toggling_autoconnect_twice_restores_display() {
        let server = MockServer::start().await;
        mount_autoconnect(&server, "yes", "no").await;
        for endpoint in [
            "/set_autoconnect_off_to_wifi_connection",
            "/set_autoconnect_on_to_wifi_connection",
        ] {
            Mock::given(method("POST"))
                .and(path(endpoint))
                .and(body_json(json!({"connection_name": "Home"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
                .expect(1)
                .mount(&server)
                .await;
        }
        let client = client(&server);

        let before = fetch_wifi_snapshot(&client).await.unwrap();
        let original = autoconnect_label(&before);
        assert_eq!(original, "Autoconnect: On");

        let current = before.remembered("Home").unwrap().autoconnect;
        Command::ToggleAutoconnect {
            name: "Home".into(),
            current,
        }
        .execute(&client)
        .await
        .unwrap();
        let middle = fetch_wifi_snapshot(&client).await.unwrap();
        assert_eq!(autoconnect_label(&middle), "Autoconnect: Off");

        let current = middle.remembered("Home").unwrap().autoconnect;
        Command::ToggleAutoconnect {
            name: "Home".into(),
            current,
        }
        .execute(&client)
        .await
        .unwrap();
        let after = fetch_wifi_snapshot(&client).await.unwrap();
        assert_eq!(autoconnect_label(&after), original);
    }

    #[tokio::test]
    async fn set_ethernet_sends_prefix_length() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/set_ethernet_ip_and_mask"))
            .and(body_json(json!({"ip": "10.0.0.7", "mask": "16"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ip": "10.0.0.7", "mask": "16"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = Command::set_ethernet("10.0.0.7", "255.255.0.0")
            .unwrap()
            .execute(&client(&server))
            .await
            .unwrap();
        assert_eq!(
            result,
            CommandResult::Address(IpAndMask {
                ip: "10.0.0.7".into(),
                mask: "16".into()
            })
        );
    }

    #[tokio::test]
    async fn rejected_command_maps_to_core_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reboot"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "busy"})))
            .mount(&server)
            .await;

        let err = Command::Reboot.execute(&client(&server)).await.unwrap_err();
        assert_eq!(
            err,
            CoreError::Rejected {
                status: 500,
                message: "busy".into()
            }
        );
    }
}
