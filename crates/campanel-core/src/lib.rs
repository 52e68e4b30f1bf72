//! Panel logic between `campanel-api` and the terminal UI.
//!
//! - **Snapshots** ([`fetch_wifi_snapshot`], [`fetch_camera_snapshot`]):
//!   the reads one tab needs, issued concurrently. Failed reads are kept as
//!   errors, never replaced with empty data.
//!
//! - **[`classify`]**: the `Active` / `Known` / `Unknown` state of a
//!   scanned network.
//!
//! - **View tree** ([`view`]): pure `render_*` functions from snapshots to
//!   sections, rows, and [`Control`]s carrying typed [`Intent`]s.
//!
//! - **[`Command`]**: every write the panel can make, executed against a
//!   [`DeviceClient`](campanel_api::DeviceClient).
//!
//! - **[`Panel`]**: active tab, loaded content, and the generation counter
//!   that discards stale results.

pub mod camera;
pub mod command;
pub mod error;
pub mod panel;
pub mod view;
pub mod wifi;

// ── Primary re-exports ──────────────────────────────────────────────
pub use camera::{CameraSnapshot, fetch_camera_snapshot};
pub use command::{Command, CommandResult};
pub use error::CoreError;
pub use panel::{Busy, LoadError, MutationOutcome, Panel, Tab, TabData, Ticket, load, run_mutation};
pub use view::{Control, Intent, View, WifiUiState, render_camera, render_failure, render_wifi};
pub use wifi::{RowState, SnapshotError, WifiResource, WifiSnapshot, classify, fetch_wifi_snapshot};
