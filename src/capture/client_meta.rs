use std::net::SocketAddr;

/// Request metadata attached to a capture by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMeta {
    pub origin_address: String,
    pub agent: Option<String>,
}

impl ClientMeta {
    pub const UNKNOWN_ORIGIN: &'static str = "unknown";

    /// Builds metadata from the forwarding header, the agent header and the socket peer.
    ///
    /// The first non-empty entry of `X-Forwarded-For` wins; otherwise the peer IP
    /// is used, and `"unknown"` when neither is available.
    pub fn from_headers(
        forwarded_for: Option<&str>,
        user_agent: Option<&str>,
        remote: Option<SocketAddr>,
    ) -> Self {
        let forwarded = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty())
            .map(str::to_string);

        let origin_address = forwarded
            .or_else(|| remote.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| Self::UNKNOWN_ORIGIN.to_string());

        let agent = user_agent
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string);

        Self {
            origin_address,
            agent,
        }
    }
}
