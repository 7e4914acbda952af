use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::cors_layer_from_env;
use axum::Router;
use core_config::server::ServerConfig;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Pause after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Path the generated OpenAPI document is served from.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Combines application routes with the cross-cutting layers every service gets.
///
/// This function sets up:
/// - OpenAPI documentation: the JSON document at [`OPENAPI_JSON_PATH`] and a
///   Scalar UI at `/scalar`
/// - A JSON 404 fallback for unknown paths
/// - Request tracing
/// - `read_timeout` bounding how long the request body may take to arrive
/// - `write_timeout` bounding the whole handler (408 when exceeded)
/// - CORS, only when `CORS_ALLOWED_ORIGIN` is set
///
/// Routes are mounted as given, without a prefix. Domain routers should
/// apply their own state before being passed in.
///
/// # Errors
/// Returns an error if `CORS_ALLOWED_ORIGIN` is set but empty or malformed.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new()
///     .route("/items", get(list_items))
///     .with_state(repo);
///
/// let router = create_router::<ApiDoc>(api_routes, &ServerConfig::default())?;
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let openapi = T::openapi();
    let spec = openapi.clone();

    let mut router = Router::new()
        .route(
            OPENAPI_JSON_PATH,
            axum::routing::get(move || {
                let spec = spec.clone();
                async move { axum::Json(spec) }
            }),
        )
        .merge(Scalar::with_url("/scalar", openapi))
        .merge(apis)
        .fallback(not_found)
        .layer(RequestBodyTimeoutLayer::new(server_config.read_timeout))
        .layer(TimeoutLayer::new(server_config.write_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    if let Some(cors) = cors_layer_from_env()? {
        router = router.layer(cors);
    }

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then drains and cleans up.
///
/// Connections are served by hyper directly so that `idle_timeout` holds:
/// a connection that sends no request head for that long (a fresh one or a
/// kept-alive one between requests) is closed.
///
/// Once a signal arrives the listener stops accepting and in-flight requests
/// get up to `shutdown_timeout` to finish; connections still open after that
/// are dropped. `cleanup` (closing pools and the like) then runs, also bounded
/// by `shutdown_timeout`.
///
/// # Errors
/// Returns an error if the listener cannot bind.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// let gateway = gateway.clone();
/// create_production_app(router, &config, Duration::from_secs(30), async move {
///     gateway.close().await;
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    info!(
        read_timeout = ?server_config.read_timeout,
        write_timeout = ?server_config.write_timeout,
        idle_timeout = ?server_config.idle_timeout,
        "Server starting on {}",
        listener.local_addr()?
    );

    let coordinator = ShutdownCoordinator::default();
    serve(
        listener,
        router,
        server_config.idle_timeout,
        coordinator.wait_for_signal(),
        shutdown_timeout,
    )
    .await;

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    Ok(())
}

/// Accept loop: one task per connection until `shutdown` completes, then
/// waits up to `drain_timeout` for open connections to finish.
async fn serve<S>(
    listener: TcpListener,
    router: Router,
    idle_timeout: Duration,
    shutdown: S,
    drain_timeout: Duration,
) where
    S: Future<Output = ()>,
{
    // HTTP/1 only: version sniffing would wait on a silent connection with no timer.
    let mut builder = auto::Builder::new(TokioExecutor::new()).http1_only();
    builder
        .http1()
        .keep_alive(true)
        .timer(TokioTimer::new())
        .header_read_timeout(idle_timeout);

    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(connection) => connection,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let service = TowerToHyperService::new(router.clone());
        let connection = builder
            .serve_connection(TokioIo::new(stream), service)
            .into_owned();
        let connection = graceful.watch(connection);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!(%peer, error = %e, "Connection closed with error");
            }
        });
    }

    drop(listener);
    info!("Stopped accepting connections, draining in-flight requests");

    tokio::select! {
        () = graceful.shutdown() => info!("All connections drained"),
        () = tokio::time::sleep(drain_timeout) => warn!(
            "Open connections did not drain within {:?}, closing them",
            drain_timeout
        ),
    }
}
