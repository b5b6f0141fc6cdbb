use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::not_found;
use crate::http::{cors::cors_layer_from_env, security::security_headers};
use axum::{Router, ServiceExt, extract::Request, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa::openapi::server::Server;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Wraps the router so `/products/` and `/products` reach the same route.
pub fn normalize_trailing_slash(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - Swagger UI at `/swagger-ui`, backed by [`OPENAPI_PATH`]
/// - API routes under `root_path` (merged at the top level when it is `/`)
/// - Tracing, security headers, and response compression
/// - CORS when `CORS_ALLOWED_ORIGIN` is set
/// - `{"detail": "Not Found"}` fallback
///
/// Health endpoints are merged by the app with `health_router()`.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` holds an invalid origin.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use utoipa::OpenApi;
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new()
///     .route("/example", get(handler))
///     .with_state(my_state);
///
/// let router = create_router::<ApiDoc>(api_routes, "/")?;
/// ```
pub fn create_router<T>(apis: Router, root_path: &str) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    create_router_with_openapi(apis, root_path, T::openapi())
}

/// [`create_router`] with an already-built document, e.g. one whose title
/// comes from configuration.
pub fn create_router_with_openapi(
    apis: Router,
    root_path: &str,
    mut openapi: utoipa::openapi::OpenApi,
) -> io::Result<Router> {
    if root_path != "/" {
        openapi.servers = Some(vec![Server::new(root_path)]);
    }

    let docs: Router = SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, openapi).into();

    let router = if root_path == "/" {
        Router::new().merge(apis)
    } else {
        Router::new().nest(root_path, apis)
    };

    let mut router = router
        .merge(docs)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    // gzip, br, deflate, zstd based on Accept-Encoding
    Ok(router.layer(CompressionLayer::new()))
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// On SIGINT/SIGTERM the server stops accepting connections, drains
/// in-flight requests, and `cleanup` runs bounded by `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// let cleanup = async move {
///     drop(client);
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if shutdown_rx.recv().await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let app = normalize_trailing_slash(router);
    let serve_result = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(coordinated_shutdown(coordinator.clone()))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Unblocks the cleanup task when the server exits without a signal
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
