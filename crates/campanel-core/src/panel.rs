// ── Panel state ──
//
// Explicit state for the content panel: the active tab, what is loaded,
// and a generation counter. Every load or mutation takes a `Ticket`; a
// result whose ticket is older than the latest one is discarded, so only
// the most recent request can replace the content.

use std::fmt;

use campanel_api::DeviceClient;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::{debug, warn};

use crate::camera::{CameraSnapshot, fetch_camera_snapshot};
use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::view::{View, WifiUiState, render_camera, render_failure, render_wifi};
use crate::wifi::{SnapshotError, WifiSnapshot, fetch_wifi_snapshot};

/// The sidebar tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Tab {
    #[default]
    #[strum(serialize = "camera", to_string = "Camera")]
    Camera,
    #[strum(serialize = "wifi", to_string = "Wi-Fi")]
    Wifi,
}

impl Tab {
    pub fn index(self) -> usize {
        Self::iter().position(|t| t == self).unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn next(self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.index() + 1) % count).unwrap_or_default()
    }

    pub fn prev(self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.index() + count - 1) % count).unwrap_or_default()
    }
}

/// Data behind one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabData {
    Camera(CameraSnapshot),
    Wifi(WifiSnapshot),
}

impl TabData {
    pub fn tab(&self) -> Tab {
        match self {
            Self::Camera(_) => Tab::Camera,
            Self::Wifi(_) => Tab::Wifi,
        }
    }
}

/// A tab failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Wifi(SnapshotError),
    Camera(CoreError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wifi(e) => e.fmt(f),
            Self::Camera(e) => write!(f, "Camera data unavailable ({e})"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Fetch everything `tab` renders from.
pub async fn load(tab: Tab, client: &DeviceClient) -> Result<TabData, LoadError> {
    debug!(%tab, "loading tab");
    match tab {
        Tab::Camera => fetch_camera_snapshot(client)
            .await
            .map(TabData::Camera)
            .map_err(LoadError::Camera),
        Tab::Wifi => fetch_wifi_snapshot(client)
            .await
            .map(TabData::Wifi)
            .map_err(LoadError::Wifi),
    }
}

/// Result of a mutation followed by a full reload of its tab.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub command: Command,
    pub result: Result<CommandResult, CoreError>,
    pub reload: Result<TabData, LoadError>,
}

/// Run `command`, then reload `tab` whether or not the command succeeded.
pub async fn run_mutation(tab: Tab, command: Command, client: &DeviceClient) -> MutationOutcome {
    let result = command.execute(client).await;
    if let Err(ref e) = result {
        warn!(command = %command.describe(), error = %e, "command failed");
    }
    let reload = load(tab, client).await;
    MutationOutcome {
        command,
        result,
        reload,
    }
}

/// Identifies one request against the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub tab: Tab,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Loading,
    Ready(TabData),
    Failed(LoadError),
}

/// The mutation is refused because another one is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy;

/// State of the content panel.
#[derive(Debug, Clone)]
pub struct Panel {
    active: Tab,
    generation: u64,
    content: Content,
    wifi_ui: WifiUiState,
    mutating: bool,
}

impl Panel {
    /// A panel on `tab`, waiting for its first load.
    pub fn new(tab: Tab) -> Self {
        Self {
            active: tab,
            generation: 0,
            content: Content::Loading,
            wifi_ui: WifiUiState::default(),
            mutating: false,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.content == Content::Loading
    }

    pub fn is_mutating(&self) -> bool {
        self.mutating
    }

    /// Loaded data for the active tab, if any.
    pub fn data(&self) -> Option<&TabData> {
        match &self.content {
            Content::Ready(data) => Some(data),
            _ => None,
        }
    }

    fn issue(&mut self) -> Ticket {
        self.generation += 1;
        self.content = Content::Loading;
        self.wifi_ui = WifiUiState::default();
        Ticket {
            tab: self.active,
            generation: self.generation,
        }
    }

    /// Switch to `tab`, dropping everything the previous tab held.
    pub fn activate(&mut self, tab: Tab) -> Ticket {
        self.active = tab;
        self.issue()
    }

    /// Reload the active tab.
    pub fn refresh(&mut self) -> Ticket {
        self.issue()
    }

    /// Start a mutation on the active tab. Only one may run at a time.
    pub fn begin_mutation(&mut self) -> Result<Ticket, Busy> {
        if self.mutating {
            return Err(Busy);
        }
        self.mutating = true;
        Ok(self.issue())
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && ticket.tab == self.active
    }

    /// Apply a load result. Returns `false` when the ticket is stale.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<TabData, LoadError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "dropping stale load"
            );
            return false;
        }
        self.content = match result {
            Ok(data) => Content::Ready(data),
            Err(e) => Content::Failed(e),
        };
        true
    }

    /// Apply the reload that follows a mutation. The mutation slot is
    /// released even when the ticket is stale.
    pub fn resolve_mutation(&mut self, ticket: Ticket, reload: Result<TabData, LoadError>) -> bool {
        self.mutating = false;
        self.resolve(ticket, reload)
    }

    /// Toggle the password field for `ssid`. No reload.
    pub fn toggle_password(&mut self, ssid: &str) {
        if self.wifi_ui.revealed.as_deref() == Some(ssid) {
            self.wifi_ui.revealed = None;
        } else {
            self.wifi_ui.revealed = Some(ssid.to_owned());
        }
    }

    pub fn hide_password(&mut self) {
        self.wifi_ui.revealed = None;
    }

    pub fn revealed(&self) -> Option<&str> {
        self.wifi_ui.revealed.as_deref()
    }

    /// Render the current content.
    pub fn view(&self) -> View {
        match &self.content {
            Content::Loading => View::Loading,
            Content::Ready(TabData::Camera(snapshot)) => View::Camera(render_camera(snapshot)),
            Content::Ready(TabData::Wifi(snapshot)) => {
                View::Wifi(render_wifi(snapshot, &self.wifi_ui))
            }
            Content::Failed(e) => View::Failed(render_failure(e)),
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(Tab::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campanel_api::IpAndMask;
    use serde_json::json;
    use std::str::FromStr;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn camera(ip: &str) -> TabData {
        TabData::Camera(CameraSnapshot {
            ethernet: IpAndMask {
                ip: ip.into(),
                mask: "24".into(),
            },
            wifi: None,
        })
    }

    #[test]
    fn tabs_cycle_in_display_order() {
        assert_eq!(Tab::iter().collect::<Vec<_>>(), vec![Tab::Camera, Tab::Wifi]);
        assert_eq!(Tab::Camera.next(), Tab::Wifi);
        assert_eq!(Tab::Wifi.next(), Tab::Camera);
        assert_eq!(Tab::Camera.prev(), Tab::Wifi);
        assert_eq!(Tab::from_index(1), Some(Tab::Wifi));
        assert_eq!(Tab::from_index(2), None);
        assert_eq!(Tab::from_str("WiFi").unwrap(), Tab::Wifi);
        assert_eq!(Tab::Wifi.to_string(), "Wi-Fi");
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut panel = Panel::new(Tab::Camera);
        let first = panel.refresh();
        let second = panel.refresh();

        assert!(!panel.resolve(first, Ok(camera("10.0.0.1"))));
        assert!(panel.is_loading());

        assert!(panel.resolve(second, Ok(camera("10.0.0.2"))));
        assert_eq!(panel.data(), Some(&camera("10.0.0.2")));
    }

    #[test]
    fn switching_tabs_discards_previous_data() {
        let mut panel = Panel::new(Tab::Camera);
        let ticket = panel.refresh();
        panel.resolve(ticket, Ok(camera("10.0.0.1")));

        let wifi = panel.activate(Tab::Wifi);
        assert!(panel.is_loading());
        assert!(matches!(panel.view(), View::Loading));
        assert!(!panel.resolve(ticket, Ok(camera("10.0.0.1"))));
        assert!(panel.resolve(wifi, Ok(TabData::Wifi(WifiSnapshot::default()))));
        assert!(matches!(panel.view(), View::Wifi(_)));
    }

    #[test]
    fn only_one_mutation_at_a_time() {
        let mut panel = Panel::new(Tab::Wifi);
        let ticket = panel.begin_mutation().unwrap();
        assert_eq!(panel.begin_mutation(), Err(Busy));

        panel.resolve_mutation(ticket, Ok(TabData::Wifi(WifiSnapshot::default())));
        assert!(!panel.is_mutating());
        assert!(panel.begin_mutation().is_ok());
    }

    #[test]
    fn password_reveal_is_local_and_reset_by_reload() {
        let mut panel = Panel::new(Tab::Wifi);
        let ticket = panel.refresh();
        panel.resolve(ticket, Ok(TabData::Wifi(WifiSnapshot::default())));
        let generation = panel.generation();

        panel.toggle_password("Cafe");
        assert_eq!(panel.revealed(), Some("Cafe"));
        assert_eq!(panel.generation(), generation);
        assert!(!panel.is_loading());

        panel.toggle_password("Cafe");
        assert_eq!(panel.revealed(), None);

        panel.toggle_password("Cafe");
        panel.refresh();
        assert_eq!(panel.revealed(), None);
    }

    #[test]
    fn failed_load_renders_failure_view() {
        let mut panel = Panel::new(Tab::Camera);
        let ticket = panel.refresh();
        panel.resolve(
            ticket,
            Err(LoadError::Camera(CoreError::Unreachable {
                message: "refused".into(),
            })),
        );
        match panel.view() {
            View::Failed(f) => assert_eq!(f.heading, "Could not load camera"),
            other => panic!("expected failure view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forget_then_reload_drops_the_connection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete_known_wifi_connection"))
            .and(body_json(json!({"connection_name": "Old"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/remembered_wifi_connections"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"connections": [{"name": "Home", "autoconnect": "yes"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/active_wifi_network"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"network": {}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/scan_wifi_networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
            .mount(&server)
            .await;
        let client =
            DeviceClient::with_client(reqwest::Client::new(), server.uri().parse().unwrap());

        let mut panel = Panel::new(Tab::Wifi);
        let ticket = panel.begin_mutation().unwrap();
        let outcome = run_mutation(
            ticket.tab,
            Command::Forget { name: "Old".into() },
            &client,
        )
        .await;
        assert!(outcome.result.is_ok());
        assert!(panel.resolve_mutation(ticket, outcome.reload));

        let View::Wifi(view) = panel.view() else {
            panic!("expected wifi view");
        };
        let names: Vec<String> = view
            .known()
            .unwrap()
            .rows
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["Home".to_owned()]);
        assert!(
            !names.contains(&"Old".to_owned()),
            "forgotten connection must not render"
        );
    }

    #[tokio::test]
    async fn failed_command_still_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shutdown"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ethernet_ip_and_mask"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ip": "10.0.0.3", "mask": "24"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wifi_ip_and_mask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "", "mask": ""})))
            .mount(&server)
            .await;
        let client =
            DeviceClient::with_client(reqwest::Client::new(), server.uri().parse().unwrap());

        let outcome = run_mutation(Tab::Camera, Command::Shutdown, &client).await;
        assert!(matches!(
            outcome.result,
            Err(CoreError::Rejected { status: 500, .. })
        ));
        assert_eq!(outcome.reload.unwrap().tab(), Tab::Camera);
    }
}
