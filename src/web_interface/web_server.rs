use std::net::SocketAddr;

use log::{info, warn};
use warp::{Filter, Rejection, Reply};

use super::assets::dashboard_routes;
use super::handlers::handle_rejection;
use super::routes::api_routes;
use crate::error_handling::types::WebError;
use crate::session_management::SessionManager;

/// Passes when `flag` is set, otherwise rejects as not found.
fn enabled(flag: bool) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::any()
        .and_then(move || async move {
            if flag {
                Ok::<(), Rejection>(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

/// Web server for the HTTP API and the operator dashboard
pub struct WebServer {
    session_manager: SessionManager,
    dashboard_enabled: bool,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(session_manager: SessionManager, dashboard_enabled: bool) -> Self {
        Self {
            session_manager,
            dashboard_enabled,
        }
    }

    /// Every route served, without rejection handling.
    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        api_routes(self.session_manager.clone())
            .or(enabled(self.dashboard_enabled).and(dashboard_routes()))
    }

    /// Serves until Ctrl-C is received.
    pub async fn start(&self, addr: SocketAddr) -> Result<(), WebError> {
        // warp panics on bind errors, so check the address binds first
        drop(
            tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| WebError::BindFailed(format!("{}: {}", addr, e)))?,
        );

        let routes = self
            .routes()
            .recover(handle_rejection)
            .with(warp::log("phishlab::http"));

        info!("Web server listening on http://{}", addr);
        if self.dashboard_enabled {
            info!("Operator dashboard available at http://{}/", addr);
        }

        tokio::select! {
            _ = warp::serve(routes).run(addr) => {},
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received");
            }
        }
        Ok(())
    }
}
