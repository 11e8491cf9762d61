use std::sync::Arc;

use log::info;

use crate::configuration::Config;
use crate::error_handling::types::ControllerError;
use crate::session_management::SessionManager;
use crate::storage::{DatabaseStorage, Storage};
use crate::web_interface::WebServer;

/// Wires storage, session management and the web server together.
pub struct Controller {
    pub config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Opens the database and serves HTTP until shutdown.
    pub async fn run(&self) -> Result<(), ControllerError> {
        let addr = self.config.socket_addr()?;

        info!(
            "Opening database at {}",
            self.config.database_path.display()
        );
        let storage: Arc<dyn Storage> =
            Arc::new(DatabaseStorage::new_file(&self.config.database_path).await?);
        let session_manager = SessionManager::new(storage);

        let server = WebServer::new(session_manager, self.config.dashboard_enabled);
        server.start(addr).await?;

        info!("Controller stopped");
        Ok(())
    }
}
