// Wire types for the appliance API.
//
// Field names follow the device's JSON exactly (upper-case keys for scan
// results, lower-case for saved connections). The firmware is loose about
// types: signal strength may arrive as a number or a numeric string, an
// absent active network is sent as `{}`, and so is an empty list of saved
// profiles. The deserializers absorb all of these.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Flags ───────────────────────────────────────────────────────────

/// The device's `"yes"` / `"no"` flag. Anything other than the exact string
/// `"yes"` reads as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for YesNo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "yes" { Self::Yes } else { Self::No })
    }
}

// ── Wi-Fi ───────────────────────────────────────────────────────────

/// One network visible in a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(rename = "SIGNAL", deserialize_with = "deserialize_signal")]
    pub signal: u8,
    #[serde(rename = "ACTIVE")]
    pub active: YesNo,
}

/// A saved credential profile, independent of current visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedConnection {
    pub name: String,
    pub autoconnect: YesNo,
}

/// The currently associated network, or an inactive marker.
///
/// The device sends `{}` when nothing is associated, so every field
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActiveConnection {
    #[serde(rename = "ACTIVE", default)]
    pub active: YesNo,
    #[serde(rename = "SSID", default)]
    pub ssid: String,
    #[serde(rename = "SIGNAL", default, deserialize_with = "deserialize_signal")]
    pub signal: u8,
}

impl ActiveConnection {
    pub fn is_active(&self) -> bool {
        self.active.is_yes()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSignal {
    Number(i64),
    Text(String),
}

/// Signal strength as a percentage, clamped to 0..=100.
fn deserialize_signal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = match RawSignal::deserialize(deserializer)? {
        RawSignal::Number(n) => n,
        RawSignal::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid SIGNAL {s:?}: {e}")))?,
    };
    Ok(u8::try_from(value.clamp(0, 100)).unwrap_or_default())
}

// ── Envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionsEnvelope {
    #[serde(deserialize_with = "deserialize_connections")]
    pub connections: Vec<RememberedConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawConnections {
    List(Vec<RememberedConnection>),
    Map(serde_json::Map<String, serde_json::Value>),
}

/// With no saved profiles the device sends `{}` instead of `[]`.
fn deserialize_connections<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RememberedConnection>, D::Error> {
    match RawConnections::deserialize(deserializer)? {
        RawConnections::List(list) => Ok(list),
        RawConnections::Map(map) if map.is_empty() => Ok(Vec::new()),
        RawConnections::Map(_) => Err(serde::de::Error::custom(
            "expected a list of connections or an empty object",
        )),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NetworksEnvelope {
    pub networks: Vec<WifiNetwork>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveNetworkEnvelope {
    #[serde(default)]
    pub network: ActiveConnection,
}

// ── Addressing ──────────────────────────────────────────────────────

/// IPv4 address and mask of one interface. Both are empty strings when the
/// interface has no address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IpAndMask {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
}

impl IpAndMask {
    pub fn has_address(&self) -> bool {
        !self.ip.trim().is_empty()
    }
}

// ── Mutations ───────────────────────────────────────────────────────

/// Success body of a mutating endpoint. The device usually answers with
/// `{"message": "..."}`; other shapes (or an empty body) are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

impl Acknowledgement {
    pub(crate) fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_json::Value = serde_json::from_str(body)?;
        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        Ok(Self { message })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ConnectionNameRequest<'a> {
    pub connection_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewApRequest<'a> {
    pub ssid: &'a str,
    #[serde(serialize_with = "expose_password")]
    pub password: &'a SecretString,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn expose_password<S: Serializer>(secret: &&SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Serialize)]
pub(crate) struct AddressRequest<'a> {
    pub ip: &'a str,
    pub mask: &'a str,
}
