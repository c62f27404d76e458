//! The kiosk web service: router, shared collaborators and the serve loop.

pub mod boarding_pass;
pub mod device;
pub mod error;
pub mod handlers;
pub mod render;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

use self::{device::Device, render::Pages, store::BoardingPassStore};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::{future::Future, io, path::PathBuf, sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal, sync::oneshot, task::JoinError, time};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn, Span};
use ulid::Ulid;

/// How long open requests may keep running once shutdown starts. A scan that
/// is still waiting for a finger is dropped after this.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Collaborators shared by every request.
pub struct Kiosk {
    pub device: Arc<dyn Device>,
    pub store: Arc<dyn BoardingPassStore>,
    pub pages: Pages,
}

impl Kiosk {
    #[must_use]
    pub fn new(device: Arc<dyn Device>, store: Arc<dyn BoardingPassStore>, pages: Pages) -> Self {
        Self {
            device,
            store,
            pages,
        }
    }
}

/// Build the kiosk router. Paths no route claims are served from `static_dir`.
pub fn router(kiosk: Arc<Kiosk>, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/register", get(handlers::register))
        .route("/submit", post(handlers::submit))
        .route("/health", get(handlers::health));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(kiosk)),
    )
}

/// Run the kiosk until SIGINT or SIGTERM.
///
/// # Errors
/// Return error if failed to bind or serve
pub async fn serve(port: u16, kiosk: Arc<Kiosk>, static_dir: Option<PathBuf>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    serve_until(listener, kiosk, static_dir, shutdown_signal(), SHUTDOWN_GRACE).await
}

/// Send the ready signal, serve `listener` until `shutdown` resolves, then shut
/// down in order: close the store, turn the device indicator off, return.
///
/// Requests still running `grace` after `shutdown` are abandoned so a scan
/// waiting on the device cannot hold the process open.
///
/// # Errors
/// Return error if the server fails. The store is closed and the indicator
/// turned off either way.
pub async fn serve_until<F>(
    listener: TcpListener,
    kiosk: Arc<Kiosk>,
    static_dir: Option<PathBuf>,
    shutdown: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    // Ready signal for the traveler.
    kiosk.device.signal_steady().await;

    let app = router(kiosk.clone(), static_dir);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    let outcome = tokio::select! {
        joined = &mut server => server_outcome(joined),
        () = shutdown => {
            let _ = stop_tx.send(());
            match time::timeout(grace, &mut server).await {
                Ok(joined) => server_outcome(joined),
                Err(_) => {
                    warn!("Requests still open after {:?}, abandoning them", grace);
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    kiosk.store.close().await;
    info!("Store connection closed");

    kiosk.device.signal_off().await;
    info!("Gracefully shutdown");

    outcome
}

fn server_outcome(joined: Result<io::Result<()>, JoinError>) -> Result<()> {
    Ok(joined??)
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
