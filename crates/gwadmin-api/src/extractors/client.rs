//! `ClientInfo` extractor: source address and requested host.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::HOST;
use axum::http::request::Parts;

use gwadmin_core::config::ServerConfig;

use crate::error::ApiError;
use crate::state::AppState;

/// Header appended to by reverse proxies.
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Where a request came from and which host it addressed.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    /// Address the brute-force guard keys on; `"unknown"` without a peer.
    pub ip: String,
    /// `Host` header, used to resolve the serving tenant.
    pub host: Option<String>,
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let forwarded = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok());

        let ip = client_ip(peer, forwarded, &state.config.server)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| parts.uri.host().map(String::from));

        Ok(Self { ip, host })
    }
}

/// Resolve the originating address.
///
/// `X-Forwarded-For` is only read when the peer is a trusted proxy. The
/// chain is walked from the right, skipping further trusted proxies, and
/// the first other hop is the client. An unparsable hop ends the walk.
fn client_ip(peer: Option<IpAddr>, forwarded: Option<&str>, server: &ServerConfig) -> Option<IpAddr> {
    let peer = peer?;
    if !server.is_trusted_proxy(peer) {
        return Some(peer);
    }

    let mut client = peer;
    for hop in forwarded.unwrap_or_default().rsplit(',') {
        let Ok(hop) = hop.trim().parse::<IpAddr>() else {
            break;
        };
        client = hop;
        if !server.is_trusted_proxy(hop) {
            break;
        }
    }
    Some(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> ServerConfig {
        ServerConfig {
            trusted_proxies: vec!["10.0.0.1".into(), "10.0.0.2".into()],
            ..Default::default()
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_untrusted_peer_ignores_forwarded_header() {
        let got = client_ip(Some(ip("1.2.3.4")), Some("9.9.9.9"), &server());
        assert_eq!(got, Some(ip("1.2.3.4")));
    }

    #[test]
    fn test_trusted_chain_yields_first_untrusted_hop() {
        let got = client_ip(
            Some(ip("10.0.0.1")),
            Some("6.6.6.6, 5.6.7.8, 10.0.0.2"),
            &server(),
        );
        assert_eq!(got, Some(ip("5.6.7.8")));
    }

    #[test]
    fn test_trusted_peer_without_usable_header() {
        assert_eq!(
            client_ip(Some(ip("10.0.0.1")), None, &server()),
            Some(ip("10.0.0.1"))
        );
        assert_eq!(
            client_ip(Some(ip("10.0.0.1")), Some("garbage"), &server()),
            Some(ip("10.0.0.1"))
        );
        assert_eq!(client_ip(None, Some("5.6.7.8"), &server()), None);
    }
}
