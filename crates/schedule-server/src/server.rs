//! HTTP server for the schedule pages and JSON API.
//!
//! Serves the server-rendered pages, the `/api` endpoints and static assets
//! on top of a [`Schedule`] backed by the JSON data file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use schedule_core::Result;
use schedule_store::{JsonFileStore, Schedule};

use crate::{handlers, pages};

/// Default location of the schedule data file.
pub const DEFAULT_DATA_FILE: &str = "data/schedule_data.json";

/// Default directory for static assets.
pub const DEFAULT_STATIC_DIR: &str = "static";

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS.
    pub cors: bool,
    /// Schedule data file.
    pub data_file: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            cors: true,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
    data_file: Option<PathBuf>,
    static_dir: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Sets the schedule data file.
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    /// Sets the static asset directory.
    pub fn static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or_else(default_addr),
            cors: self.cors.unwrap_or(true),
            data_file: self
                .data_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            static_dir: self
                .static_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The schedule service.
    pub schedule: Schedule,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Creates app state over an existing schedule.
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            start_time: Instant::now(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server over the configured data file.
    pub fn new(config: ServerConfig) -> Self {
        let schedule = Schedule::new(JsonFileStore::new(&config.data_file));
        Self::with_schedule(config, schedule)
    }

    /// Creates a new server over an existing schedule.
    pub fn with_schedule(config: ServerConfig, schedule: Schedule) -> Self {
        let state = Arc::new(AppState::new(schedule));
        Self { config, state }
    }

    /// Creates the router.
    pub fn router(&self) -> Router {
        let static_dir = &self.config.static_dir;

        let mut router = Router::new()
            // Pages
            .route("/", get(pages::index))
            .route("/about", get(pages::about))
            .route("/schedule", get(pages::schedule))
            .route("/add-event", get(pages::add_event))
            // JSON API
            .route(
                "/api/schedule",
                get(handlers::list_lessons).post(handlers::add_lesson),
            )
            .route("/api/schedule/:id", delete(handlers::delete_lesson))
            .route("/api/current-lesson", get(handlers::current_lesson))
            .route("/health", get(handlers::health))
            // Static assets
            .nest_service("/static", ServeDir::new(static_dir))
            .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
            .with_state(self.state.clone());

        // Add middleware
        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        tracing::info!(
            addr = %self.config.addr,
            data_file = %self.config.data_file.display(),
            "Starting SmartSchedule server"
        );
        eprintln!("\n\x1b[32m✓\x1b[0m Server listening on http://{}", self.config.addr);
        eprintln!("  Pages:");
        for (path, name) in [
            ("/", "home"),
            ("/about", "about"),
            ("/schedule", "schedule"),
            ("/add-event", "add lesson"),
        ] {
            eprintln!("    http://{}{:<12} {}", self.config.addr, path, name);
        }
        eprintln!("  Press Ctrl+C to stop\n");

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        // Set up graceful shutdown
        let shutdown_signal = async {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut signal) => {
                        signal.recv().await;
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    },
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received Ctrl+C, shutting down gracefully...");
                },
                () = terminate => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received SIGTERM, shutting down gracefully...");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        tracing::info!(
            uptime_seconds = self.state.start_time.elapsed().as_secs(),
            "Server shutdown complete"
        );
        eprintln!("\x1b[32m✓\x1b[0m Server stopped");

        Ok(())
    }
}
