mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::analytics::{routes as analytics_routes, AnalyticsService};
use crate::features::auth::{
    routes as auth_routes, AuthService, GoogleOAuthClient, TokenService,
};
use crate::features::files::{
    routes as files_routes, AnnotationService, CaptionService, FileService, TranscriptionService,
};
use crate::features::stories::{routes as stories_routes, StoryService, VideoGenerationService};
use crate::modules::genai::GeminiClient;
use crate::modules::media::MediaToolkit;
use crate::modules::storage::{LocalStore, UPLOADS_URL_PREFIX};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize local storage for uploaded media
    let store = Arc::new(
        LocalStore::new(&config.storage)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize upload storage: {}", e))?,
    );
    tracing::info!("Upload storage initialized at {}", store.root().display());

    // Initialize auth services
    let google_client = Arc::new(GoogleOAuthClient::new(config.google_oauth.clone()));
    if google_client.is_configured() {
        tracing::info!("Google OAuth configured");
    } else {
        tracing::warn!("Google OAuth not configured; /api/auth/google will be unavailable");
    }
    let token_service = Arc::new(TokenService::new(pool.clone(), &config.auth));
    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        Arc::clone(&token_service),
        Arc::clone(&google_client),
    ));
    tracing::info!("Auth services initialized");

    // Shared Gemini client, used by transcription, annotation, stories and video
    let gemini = config
        .vendors
        .gemini_api_key
        .clone()
        .map(|key| Arc::new(GeminiClient::new(key)));

    // Initialize annotation pipeline services
    let media = Arc::new(MediaToolkit::new(config.media.clone()));
    let transcriptions = Arc::new(TranscriptionService::from_config(
        &config.vendors,
        gemini.clone(),
    ));
    tracing::info!(
        "Transcription chain initialized with {} vendor(s)",
        transcriptions.provider_count()
    );
    let captions = Arc::new(CaptionService::from_config(&config.vendors));
    let annotations = Arc::new(AnnotationService::new(gemini.clone()));

    // Initialize Analytics Service
    let analytics_service = Arc::new(AnalyticsService::new(pool.clone()));
    tracing::info!("Analytics service initialized");

    // Initialize File Service
    let file_service = Arc::new(FileService::new(
        pool.clone(),
        Arc::clone(&store),
        Arc::clone(&media),
        Arc::clone(&transcriptions),
        Arc::clone(&captions),
        Arc::clone(&annotations),
        Arc::clone(&analytics_service),
        &config.storage,
    ));
    tracing::info!("File service initialized");

    // Initialize Story Services
    let videos = Arc::new(VideoGenerationService::from_config(
        &config.vendors,
        gemini.clone(),
    ));
    let story_service = Arc::new(StoryService::new(
        pool.clone(),
        Arc::clone(&store),
        gemini,
        Arc::clone(&videos),
        Arc::clone(&analytics_service),
    ));
    tracing::info!("Story service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(files_routes::routes(file_service, &config.storage))
        .merge(stories_routes::routes(story_service))
        .merge(analytics_routes::routes(Arc::clone(&analytics_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            token_service.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/api/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new().merge(auth_routes::public_routes(auth_service));

    // Uploaded media is served straight from disk
    let uploads = Router::new().nest_service(UPLOADS_URL_PREFIX, ServeDir::new(store.root()));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .merge(uploads)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
