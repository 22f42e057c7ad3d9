//! Studyroom server wiring
//!
//! Builds the storage layer, the attendance service and the REST router
//! from a [`StudyroomConfig`], and serves the result.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use studyroom_config::{LoggingConfig, StudyroomConfig};
use studyroom_core::{AttendanceService, WindowResolver};
use studyroom_rest_api::{create_rest_app, AppConfig, AttendanceContext};
use studyroom_storage::{
    DatabaseConfig, DatabaseConnection, SeaOrmRepositoryFactory, SeaOrmSessionRepository, SeaOrmUserRepository,
};

/// The assembled server, ready to listen
pub struct Server {
    config: StudyroomConfig,
    router: Router,
}

impl Server {
    /// Wire storage, service and router from configuration
    pub async fn new(config: StudyroomConfig) -> Result<Self> {
        let db_config = DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            connection_timeout: config.database.connection_timeout(),
        };
        let db = DatabaseConnection::connect_and_migrate(db_config).await?;

        let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let sessions = Arc::new(SeaOrmSessionRepository::new(db.clone()));
        let repositories = Arc::new(SeaOrmRepositoryFactory::new(db));

        let resolver = WindowResolver::new(config.attendance.zone_offset());
        let service = Arc::new(AttendanceService::new(
            users,
            sessions,
            resolver,
            config.attendance.trend_days,
        ));

        let context = AttendanceContext::new(repositories, service, config.attendance.default_leaderboard_top);
        let app_config = AppConfig {
            enable_cors: config.server.enable_cors,
            enable_tracing: config.server.enable_tracing,
            api_prefix: config.server.api_prefix.clone(),
        };
        let router = create_rest_app(context, app_config);

        Ok(Self { config, router })
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.server.bind_address, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("studyroom server listening on {}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Initialize tracing with environment variable override support
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', falling back to 'info'", config.level);
            EnvFilter::new("info")
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.ansi)
        .init();
    Ok(())
}
