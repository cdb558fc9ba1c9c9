use actix_web::HttpRequest;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Header appended to by reverse proxies, client first
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Address used when the peer address is unavailable (e.g. in-process tests)
pub const UNKNOWN_CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Reverse proxies whose `X-Forwarded-For` entries are believed
///
/// With no proxies configured the TCP peer is always the client.
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(Arc<[IpAddr]>);

impl TrustedProxies {
  pub fn new(proxies: impl Into<Arc<[IpAddr]>>) -> Self {
    Self(proxies.into())
  }

  pub fn is_trusted(&self, ip: &IpAddr) -> bool {
    self.0.contains(ip)
  }

  /// Resolves the address of the client behind a request
  ///
  /// The peer address is used unless it is a trusted proxy. In that case the
  /// `X-Forwarded-For` chain is walked from the right, skipping trusted hops,
  /// and the first other address is the client. An entry that is not an IP
  /// address ends the walk and the peer address is used.
  pub fn client_ip(&self, req: &HttpRequest) -> IpAddr {
    let Some(peer) = req.peer_addr().map(|addr| addr.ip()) else {
      return UNKNOWN_CLIENT_IP;
    };

    if !self.is_trusted(&peer) {
      return peer;
    }

    self.forwarded_client(req).unwrap_or(peer)
  }

  fn forwarded_client(&self, req: &HttpRequest) -> Option<IpAddr> {
    let mut hops = Vec::new();
    for value in req.headers().get_all(FORWARDED_FOR_HEADER) {
      let value = value.to_str().ok()?;
      for entry in value.split(',') {
        hops.push(parse_hop(entry)?);
      }
    }

    let mut client = None;
    for hop in hops.into_iter().rev() {
      client = Some(hop);
      if !self.is_trusted(&hop) {
        break;
      }
    }
    client
  }
}

/// Parses `ip`, `ipv4:port` or `[ipv6]:port`
fn parse_hop(entry: &str) -> Option<IpAddr> {
  let entry = entry.trim();
  entry
    .parse::<IpAddr>()
    .or_else(|_| entry.parse::<SocketAddr>().map(|socket| socket.ip()))
    .ok()
}
