#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::http::header::{LOCATION, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

/// An axum server running on its own runtime thread, bound to an ephemeral
/// port on 127.0.0.1. Shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    handle: Handle,
}

impl TestServer {
    pub fn plain(router: Router) -> Self {
        Self::start(router, false)
    }

    /// Serves `router` over TLS with the self-signed certificate in `tests/fixtures`.
    pub fn tls(router: Router) -> Self {
        Self::start(router, true)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    fn start(router: Router, tls: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        listener.set_nonblocking(true).expect("set listener non-blocking");
        let addr = listener.local_addr().expect("test listener address");

        let handle = Handle::new();
        let server_handle = handle.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build test runtime");

            runtime.block_on(async move {
                let service = router.into_make_service();
                let served = if tls {
                    let _ = rustls::crypto::ring::default_provider().install_default();
                    let config = RustlsConfig::from_pem_file(fixture("cert.pem"), fixture("key.pem"))
                        .await
                        .expect("load test certificate");
                    axum_server::tls_rustls::from_tcp_rustls(listener, config)
                        .handle(server_handle)
                        .serve(service)
                        .await
                } else {
                    axum_server::from_tcp(listener)
                        .handle(server_handle)
                        .serve(service)
                        .await
                };
                served.expect("test server failed");
            });
        });

        Self { addr, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Answers `GET /` with `status` and an empty body.
pub fn status_router(status: StatusCode) -> Router {
    Router::new().route("/", get(move || async move { status }))
}

/// Redirects `/` to `location`, which answers with `final_status`.
pub fn redirect_router(redirect: StatusCode, location: &'static str, final_status: StatusCode) -> Router {
    Router::new()
        .route("/", get(move || async move { (redirect, [(LOCATION, location)]) }))
        .route(location, get(move || async move { final_status }))
}

/// Records the `User-Agent` of every request it receives.
#[derive(Clone, Default)]
pub struct Recorder {
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn router(&self) -> Router {
        let user_agents = self.user_agents.clone();
        Router::new().route(
            "/",
            get(move |headers: HeaderMap| async move {
                let user_agent = headers
                    .get(USER_AGENT)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                user_agents.lock().unwrap().push(user_agent);
                StatusCode::OK
            }),
        )
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

/// A port on 127.0.0.1 that nothing is listening on.
pub fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("reserve port");
    listener.local_addr().expect("reserved port address").port()
}
