//! `commission serve` -- wire the configured backend into the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use commission_core::codec::header_row;
use commission_core::{Clock, RateLimiter, SubmissionStore, SystemClock};
use commission_server::{build_router, AppState};
use commission_sheets::SheetsStore;
use commission_storage::{MemoryTable, TabularStore};
use tracing::{info, warn};

use crate::config::{Backend, Settings};

/// Start the HTTP server and run until Ctrl+C.
///
/// When TLS cert/key paths are provided, the server listens over HTTPS
/// using `axum-server` with rustls. Otherwise it uses plain HTTP.
pub async fn start_server(
    settings: Settings,
    _tls_cert: Option<PathBuf>,
    _tls_key: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table: Arc<dyn TabularStore> = match settings.backend {
        Backend::Memory => {
            warn!("using the in-memory table; submissions are lost on exit");
            Arc::new(MemoryTable::with_rows(vec![header_row()]))
        }
        Backend::Sheets(config) => {
            info!(
                spreadsheet = %config.spreadsheet_id,
                tab = %config.tab,
                account = %config.client_email,
                "using Google Sheets backend"
            );
            Arc::new(SheetsStore::connect(config)?)
        }
    };

    if settings.admin.is_enforced() {
        info!("admin key authentication enabled");
    } else {
        warn!("ADMIN_SECRET is not set; admin routes are open");
    }
    info!(
        max = settings.max_per_window,
        window_secs = settings.window_secs,
        "intake rate limit"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::new(
        SubmissionStore::new(table, clock.clone()),
        RateLimiter::new(settings.max_per_window, settings.window_secs, clock),
        settings.admin,
    );
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", settings.port);

    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) = (&_tls_cert, &_tls_key) {
        let config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
        let socket_addr: std::net::SocketAddr = addr.parse()?;
        info!("commission service listening on https://{addr}");
        axum_server::bind_rustls(socket_addr, config)
            .serve(app.into_make_service())
            .await?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("commission service listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("received shutdown signal");
}
