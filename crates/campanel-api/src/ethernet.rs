// Ethernet addressing endpoints

use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{AddressRequest, IpAndMask};

impl DeviceClient {
    /// Current IPv4 address and mask of the wired interface.
    ///
    /// `GET /ethernet_ip_and_mask`
    pub async fn ethernet_ip_and_mask(&self) -> Result<IpAndMask, Error> {
        debug!("fetching ethernet address");
        self.get("ethernet_ip_and_mask").await
    }

    /// Assign a static address to the wired interface. The device echoes the
    /// address it applied.
    ///
    /// `POST /set_ethernet_ip_and_mask` with `{"ip", "mask"}`
    pub async fn set_ethernet_ip_and_mask(&self, ip: &str, mask: &str) -> Result<IpAndMask, Error> {
        debug!(ip, mask, "setting ethernet address");
        self.post_json("set_ethernet_ip_and_mask", &AddressRequest { ip, mask })
            .await
    }
}
