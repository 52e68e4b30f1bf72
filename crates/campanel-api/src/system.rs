// Power endpoints

use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::Acknowledgement;

impl DeviceClient {
    /// `POST /reboot`
    pub async fn reboot(&self) -> Result<Acknowledgement, Error> {
        debug!("requesting reboot");
        self.post_empty("reboot").await
    }

    /// `POST /shutdown`
    pub async fn shutdown(&self) -> Result<Acknowledgement, Error> {
        debug!("requesting shutdown");
        self.post_empty("shutdown").await
    }
}
