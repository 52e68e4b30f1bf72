// campanel-api: Async Rust client for the appliance's HTTP management API.
//
// One inherent method per device endpoint, grouped by concern (ethernet,
// system, wifi). Every method returns `Result<T, Error>`; transport and
// HTTP failures are normalized into `Error` at this boundary.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod ethernet;
mod system;
mod wifi;

pub use client::DeviceClient;
pub use error::{Error, ErrorPayload};
pub use models::{
    Acknowledgement, ActiveConnection, IpAndMask, RememberedConnection, WifiNetwork, YesNo,
};
pub use transport::TransportConfig;
