//! Client IP extraction
//!
//! The socket peer address is used by default. Behind a reverse proxy
//! (`TRUST_PROXY=true`) the left-most `X-Forwarded-For` entry wins, then
//! `X-Real-IP`.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.trust_proxy {
            if let Some(ip) = forwarded_ip(&parts.headers) {
                return Ok(ClientIp(ip));
            }
        }

        let ip = match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => addr.ip(),
            None => {
                // Only happens when the router is served without connect info
                tracing::debug!("No peer address on request, using unspecified IP");
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }
        };
        Ok(ClientIp(ip))
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str, pick_first: bool| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| if pick_first { v.split(',').next() } else { Some(v) })
            .and_then(|v| v.trim().parse().ok())
    };

    header_ip(X_FORWARDED_FOR, true).or_else(|| header_ip(X_REAL_IP, false))
}
