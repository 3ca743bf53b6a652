use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::error::ProbeError;

/// Version reported by `-version` and in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const USER_AGENT_VALUE: &str = concat!("healthcheck/", env!("CARGO_PKG_VERSION"));

/// Total time allowed for the single request, the same as the blocking client's own default.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The address:port:scheme tuple being probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub address: String,
    pub port: u16,
    pub tls: bool,
}

impl Target {
    pub fn new(address: impl Into<String>, port: u16, tls: bool) -> Self {
        Self {
            address: address.into(),
            port,
            tls,
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port/`, with IPv6 literals bracketed.
    pub fn url(&self) -> Result<Url, ProbeError> {
        let socket = join_host_port(&self.address, self.port);
        Ok(Url::parse(&format!("{}://{}/", self.scheme(), socket))?)
    }

    /// A `GET` for the target's root.
    pub fn request(&self) -> Result<Request, ProbeError> {
        let url = self.url()?;
        debug!(%url, "built request");
        Ok(Request::new(Method::GET, url))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Builds a dedicated client for one probe. Nothing is shared between calls,
/// so the insecure setting never leaks into another client.
pub fn build_client(insecure: bool) -> Result<Client, ProbeError> {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
    if insecure {
        warn!("certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }
    debug!(insecure, timeout = ?REQUEST_TIMEOUT, "built client");
    builder.build().map_err(ProbeError::ClientConfiguration)
}

pub fn build_request(address: &str, port: u16, tls: bool) -> Result<Request, ProbeError> {
    Target::new(address, port, tls).request()
}

/// Sends `request` once and classifies the answer: any status below 400,
/// redirects included, counts as reachable.
pub fn check(client: &Client, mut request: Request) -> Result<(), ProbeError> {
    request
        .headers_mut()
        .insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    let response = client.execute(request).map_err(ProbeError::Transport)?;
    let status = response.status();
    debug!(%status, url = %response.url(), "received response");

    if status.as_u16() >= 400 {
        return Err(ProbeError::HttpStatus(status));
    }
    Ok(())
}
