use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{Router, extract::DefaultBodyLimit, http::StatusCode, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    application::usercases::authentication::AuthenticationUseCase,
    auth::PasswordHasher,
    config::config_model::{DotEnvyConfig, StorageBackend},
    domain::repositories::{
        streams::StreamRepository, users::UserRepository, videos::VideoRepository,
    },
    infrastructure::{
        axum_http::{
            default_routers,
            pages::PageRenderer,
            routers,
            session::{SessionStore, session_middleware},
        },
        memory::{
            memory_store::MemoryStore,
            repositories::{streams::StreamMemory, users::UserMemory, videos::VideoMemory},
        },
        sqlite::{
            repositories::{streams::StreamSqlite, users::UserSqlite, videos::VideoSqlite},
            sqlite_connection,
        },
    },
};

/// The three stores the pages read and write, all from the same backend.
pub struct Repositories<U, V, S> {
    pub users: Arc<U>,
    pub videos: Arc<V>,
    pub streams: Arc<S>,
}

pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    let app = match config.storage.backend {
        StorageBackend::Sqlite => {
            let db_pool = Arc::new(sqlite_connection::establish_connection(
                &config.storage.database_url,
                config.storage.max_connections,
            )?);
            info!("SQLite connection has been established");

            build_app(
                &config,
                Repositories {
                    users: Arc::new(UserSqlite::new(Arc::clone(&db_pool))),
                    videos: Arc::new(VideoSqlite::new(Arc::clone(&db_pool))),
                    streams: Arc::new(StreamSqlite::new(Arc::clone(&db_pool))),
                },
            )
            .await?
        }
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            info!("In-memory store has been created");

            build_app(
                &config,
                Repositories {
                    users: Arc::new(UserMemory::new(Arc::clone(&store))),
                    videos: Arc::new(VideoMemory::new(Arc::clone(&store))),
                    streams: Arc::new(StreamMemory::new(Arc::clone(&store))),
                },
            )
            .await?
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        backend = %config.storage.backend,
        "Server is running on port {}", config.server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Seeds the demo account and assembles every page behind the session layer.
pub async fn build_app<U, V, S>(
    config: &DotEnvyConfig,
    repositories: Repositories<U, V, S>,
) -> Result<Router>
where
    U: UserRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    let Repositories {
        users,
        videos,
        streams,
    } = repositories;

    let password_hasher = PasswordHasher::new(config.security.password_scheme);
    let pages = Arc::new(PageRenderer::new()?);
    let sessions = Arc::new(SessionStore::new(
        config.security.session_ttl_minutes,
        config.security.cookie_secure,
    ));

    if let Some(demo_account) = &config.demo_account {
        AuthenticationUseCase::new(Arc::clone(&users), password_hasher)
            .ensure_demo_account(demo_account)
            .await?;
    }

    let pages_router = Router::new()
        .merge(routers::auth::routes(
            Arc::clone(&users),
            password_hasher,
            Arc::clone(&pages),
            config.demo_account.clone(),
        ))
        .merge(routers::dashboard::routes(
            Arc::clone(&videos),
            Arc::clone(&streams),
            Arc::clone(&pages),
        ))
        .nest(
            "/gallery",
            routers::gallery::routes(Arc::clone(&videos), Arc::clone(&pages)),
        )
        .nest(
            "/streams",
            routers::streams::routes(Arc::clone(&streams), Arc::clone(&videos), Arc::clone(&pages)),
        )
        .nest(
            "/settings",
            routers::settings::routes(Arc::clone(&users), password_hasher, Arc::clone(&pages)),
        )
        .route_layer(middleware::from_fn_with_state(sessions, session_middleware));

    // Health checks and unknown paths never start a session.
    let app = Router::new()
        .merge(pages_router)
        .route("/health-check", get(default_routers::health_check))
        .fallback(default_routers::not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout),
        ))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
