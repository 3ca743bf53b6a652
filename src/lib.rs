//! Single-shot HTTP(S) liveness probe.
//!
//! [`probe::build_client`] and [`probe::build_request`] prepare one `GET /`
//! against the target, and [`probe::check`] sends it once and classifies the
//! response. The `healthcheck` binary turns the outcome into an exit code.

pub mod config;
pub mod error;
pub mod probe;
pub mod telemetry;

pub use config::Config;
pub use error::ProbeError;
pub use probe::{build_client, build_request, check, Target, VERSION};
