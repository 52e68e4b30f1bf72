// ── Pure view tree ──
//
// `render_*` functions turn fetched data into a tree of sections, rows, and
// controls. Nothing here touches the terminal; the TUI draws the tree and
// maps key presses onto the `Intent` attached to each control. Every render
// starts from scratch, so a tree never outlives the data it was built from.

use campanel_api::{IpAndMask, YesNo};

use crate::camera::CameraSnapshot;
use crate::command::Command;
use crate::panel::LoadError;
use crate::wifi::{RowState, WifiSnapshot, classify};

pub const LOADING_TEXT: &str = "Loading, please wait...";
pub const NO_DEVICES_TEXT: &str = "No devices found";
pub const PASSWORD_PLACEHOLDER: &str = "Enter password";

/// The whole content panel.
#[derive(Debug, Clone)]
pub enum View {
    Loading,
    Camera(CameraView),
    Wifi(WifiView),
    Failed(FailureView),
}

// ── Controls ────────────────────────────────────────────────────────

/// What activating a control asks for.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Mutate the device, then reload the tab.
    Run(Command),
    /// Show the password field on every row with this SSID. Local only.
    RevealPassword { ssid: String },
    /// Join `ssid` with whatever the password field holds.
    SubmitPassword { ssid: String },
    /// Open the address editor pre-filled with the current address.
    EditEthernet { current: IpAndMask },
    /// Point the user at the camera's own web UI.
    OpenCamera { url: String },
}

impl Intent {
    /// Whether acting on this intent writes to the device.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Run(_) | Self::SubmitPassword { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Control {
    pub label: String,
    pub intent: Intent,
}

impl Control {
    fn new(label: impl Into<String>, intent: Intent) -> Self {
        Self {
            label: label.into(),
            intent,
        }
    }
}

// ── Wi-Fi ───────────────────────────────────────────────────────────

/// Panel-local UI state that survives nothing but a password reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiUiState {
    /// SSID whose rows currently show the password field.
    pub revealed: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WifiView {
    pub title: &'static str,
    pub sections: Vec<WifiSection>,
}

/// Sections appear in this order, each only when it applies.
#[derive(Debug, Clone)]
pub enum WifiSection {
    Active(ActivePanel),
    Known(KnownPanel),
    Available(AvailablePanel),
}

#[derive(Debug, Clone)]
pub struct ActivePanel {
    pub heading: &'static str,
    pub ssid: String,
    pub signal: u8,
    pub ssid_line: String,
    pub signal_line: String,
}

#[derive(Debug, Clone)]
pub struct KnownPanel {
    pub heading: &'static str,
    pub rows: Vec<KnownRow>,
}

#[derive(Debug, Clone)]
pub struct KnownRow {
    pub name: String,
    pub autoconnect: YesNo,
    pub autoconnect_label: String,
    pub toggle: Control,
    pub forget: Control,
}

#[derive(Debug, Clone)]
pub struct AvailablePanel {
    pub heading: &'static str,
    pub rows: Vec<AvailableRow>,
}

#[derive(Debug, Clone)]
pub struct AvailableRow {
    pub ssid: String,
    pub signal: u8,
    pub signal_line: String,
    pub state: RowState,
    pub action: RowAction,
}

/// The single affordance an available-network row offers.
#[derive(Debug, Clone)]
pub enum RowAction {
    Disconnect(Control),
    Connect(Control),
    PasswordEntry {
        placeholder: &'static str,
        confirm: Control,
    },
}

impl RowAction {
    pub fn control(&self) -> &Control {
        match self {
            Self::Disconnect(c) | Self::Connect(c) => c,
            Self::PasswordEntry { confirm, .. } => confirm,
        }
    }
}

impl WifiView {
    pub fn active(&self) -> Option<&ActivePanel> {
        self.sections.iter().find_map(|s| match s {
            WifiSection::Active(p) => Some(p),
            _ => None,
        })
    }

    pub fn known(&self) -> Option<&KnownPanel> {
        self.sections.iter().find_map(|s| match s {
            WifiSection::Known(p) => Some(p),
            _ => None,
        })
    }

    pub fn available(&self) -> Option<&AvailablePanel> {
        self.sections.iter().find_map(|s| match s {
            WifiSection::Available(p) => Some(p),
            _ => None,
        })
    }
}

pub fn render_wifi(snapshot: &WifiSnapshot, ui: &WifiUiState) -> WifiView {
    let mut sections = Vec::with_capacity(3);

    let active = &snapshot.active;
    if active.is_active() {
        sections.push(WifiSection::Active(ActivePanel {
            heading: "Connected Wi-Fi",
            ssid: active.ssid.clone(),
            signal: active.signal,
            ssid_line: format!("SSID: {}", active.ssid),
            signal_line: format!("Signal: {}%", active.signal),
        }));
    }

    if !snapshot.remembered.is_empty() {
        let rows = snapshot
            .remembered
            .iter()
            .map(|conn| {
                let on = conn.autoconnect.is_yes();
                KnownRow {
                    name: conn.name.clone(),
                    autoconnect: conn.autoconnect,
                    autoconnect_label: format!("Autoconnect: {}", if on { "On" } else { "Off" }),
                    toggle: Control::new(
                        if on { "Disable" } else { "Enable" },
                        Intent::Run(Command::ToggleAutoconnect {
                            name: conn.name.clone(),
                            current: conn.autoconnect,
                        }),
                    ),
                    forget: Control::new(
                        "Forget",
                        Intent::Run(Command::Forget {
                            name: conn.name.clone(),
                        }),
                    ),
                }
            })
            .collect();
        sections.push(WifiSection::Known(KnownPanel {
            heading: "Known Wi-Fi Networks",
            rows,
        }));
    }

    let rows = snapshot
        .available
        .iter()
        .map(|network| {
            let state = classify(network, &snapshot.remembered);
            let ssid = network.ssid.clone();
            let action = match state {
                RowState::Active => RowAction::Disconnect(Control::new(
                    "Disconnect",
                    Intent::Run(Command::Disconnect { name: ssid.clone() }),
                )),
                RowState::Known => RowAction::Connect(Control::new(
                    "Connect",
                    Intent::Run(Command::ConnectKnown { name: ssid.clone() }),
                )),
                RowState::Unknown if ui.revealed.as_deref() == Some(ssid.as_str()) => {
                    RowAction::PasswordEntry {
                        placeholder: PASSWORD_PLACEHOLDER,
                        confirm: Control::new(
                            "Confirm",
                            Intent::SubmitPassword { ssid: ssid.clone() },
                        ),
                    }
                }
                RowState::Unknown => RowAction::Connect(Control::new(
                    "Connect",
                    Intent::RevealPassword { ssid: ssid.clone() },
                )),
            };
            AvailableRow {
                signal_line: format!("Signal: {}%", network.signal),
                signal: network.signal,
                ssid,
                state,
                action,
            }
        })
        .collect();
    sections.push(WifiSection::Available(AvailablePanel {
        heading: "Available Wi-Fi Networks",
        rows,
    }));

    WifiView {
        title: "Wi-Fi Settings",
        sections,
    }
}

// ── Camera ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CameraView {
    /// Empty when `placeholder` is set.
    pub cards: Vec<DeviceCard>,
    pub placeholder: Option<&'static str>,
    pub wifi_line: String,
    pub system: Vec<Control>,
}

#[derive(Debug, Clone)]
pub struct DeviceCard {
    pub title: String,
    pub mask_line: String,
    pub controls: Vec<Control>,
}

pub fn render_camera(snapshot: &CameraSnapshot) -> CameraView {
    let (cards, placeholder) = match (snapshot.camera_ip(), snapshot.camera_url()) {
        (Some(ip), Some(url)) => {
            let card = DeviceCard {
                title: ip.to_owned(),
                mask_line: format!("Mask: {}", snapshot.ethernet.mask),
                controls: vec![
                    Control::new("Camera", Intent::OpenCamera { url }),
                    Control::new(
                        "Edit address",
                        Intent::EditEthernet {
                            current: snapshot.ethernet.clone(),
                        },
                    ),
                ],
            };
            (vec![card], None)
        }
        _ => (Vec::new(), Some(NO_DEVICES_TEXT)),
    };

    let wifi_line = match &snapshot.wifi {
        Some(addr) if addr.has_address() => format!("Wi-Fi: {}/{}", addr.ip, addr.mask),
        Some(_) => "Wi-Fi: not connected".to_owned(),
        None => "Wi-Fi: unavailable".to_owned(),
    };

    CameraView {
        cards,
        placeholder,
        wifi_line,
        system: vec![
            Control::new("Reboot", Intent::Run(Command::Reboot)),
            Control::new("Shutdown", Intent::Run(Command::Shutdown)),
        ],
    }
}

// ── Failure ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureView {
    pub heading: String,
    /// One line per failed read.
    pub lines: Vec<String>,
    pub hint: &'static str,
}

pub fn render_failure(error: &LoadError) -> FailureView {
    let (heading, lines) = match error {
        LoadError::Wifi(err) => (
            "Could not load Wi-Fi settings".to_owned(),
            err.failures
                .iter()
                .map(|(resource, e)| format!("{resource}: {e}"))
                .collect(),
        ),
        LoadError::Camera(e) => ("Could not load camera".to_owned(), vec![e.to_string()]),
    };
    FailureView {
        heading,
        lines,
        hint: "Press r to retry",
    }
}
