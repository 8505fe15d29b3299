use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod db;
mod error;
mod models;
mod responses;
mod services;
mod shutdown;

use api::AppState;
use config::Config;
use constants::{API_NAME, API_VERSION};
use db::Database;
use error::AppError;
use services::DojoClient;
use shutdown::{DrainOutcome, ShutdownContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqua_stark_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting {}", API_NAME);
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    // Initialize database
    let db = Database::new(&config).await?;

    tracing::info!("Running database migrations...");
    db.run_migrations().await?;

    // Chain client
    let chain = DojoClient::from_config(&config);
    chain.initialize();

    let state = AppState::new(Arc::new(db), Arc::new(chain), config.clone());
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    log_startup_banner(&config);

    let shutdown = Arc::new(ShutdownContext::new(config.shutdown_timeout()));
    tokio::spawn(shutdown::listen_for_signals(shutdown.clone()));

    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move { shutdown.wait().await }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = shutdown.wait() => {
            if let DrainOutcome::Completed(result) = shutdown.drain(&mut server).await {
                result?;
            }
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    with_layers(api_routes(), &state.config).with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & info
        .route("/health", get(api::health::health_check))
        .route("/api", get(api::api_info))
        .route("/api/health", get(api::health::health_check))
        // Players
        .route("/api/player/register", post(api::player::register_player))
        .route("/api/player/{address}", get(api::player::get_player))
        .route("/api/player/{address}/tanks", get(api::player::get_player_tanks))
        .route("/api/player/{address}/fish", get(api::player::get_player_fish))
        .route(
            "/api/player/{address}/decorations",
            get(api::player::get_player_decorations),
        )
        // Tanks
        .route("/api/tank/{id}", get(api::tank::get_tank))
        .route("/api/tank/{id}/multiplier", get(api::tank::get_multiplier))
        .route("/api/tanks/mint", post(api::tank::mint_tank))
        // Fish
        .route("/api/fish/mint", post(api::fish::mint_fish))
        .route("/api/fish/feed", post(api::fish::feed_fish))
        .route("/api/fish/breed", post(api::fish::breed_fish))
        .route("/api/fish/{id}", get(api::fish::get_fish))
        .route("/api/fish/{id}/family-tree", get(api::fish::get_family_tree))
        // Decorations
        .route("/api/decoration/{id}", get(api::decoration::get_decoration))
        .route("/api/decorations/mint", post(api::decoration::mint_decoration))
        .route(
            "/api/decoration/{id}/activate",
            post(api::decoration::activate_decoration),
        )
        .route(
            "/api/decoration/{id}/deactivate",
            post(api::decoration::deactivate_decoration),
        )
        // Sync queue
        .route("/api/sync/pending", get(api::sync::get_pending))
        .route("/api/sync/{tx_hash}", get(api::sync::get_by_tx_hash))
}

fn with_layers(router: Router<AppState>, config: &Config) -> Router<AppState> {
    router
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::method_not_allowed)
        .layer(cors_from_config(config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::from_panic(payload).into_response()
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let origins = config.cors_origins();
    if origins.is_empty() {
        return permissive_cors(config.cors_credentials);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return permissive_cors(config.cors_credentials);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(config.cors_credentials)
}

// Wildcards cannot be combined with credentials, so the credentialed variant mirrors the request.
fn permissive_cors(credentials: bool) -> CorsLayer {
    if credentials {
        CorsLayer::very_permissive()
    } else {
        CorsLayer::permissive()
    }
}

fn log_startup_banner(config: &Config) {
    let status = if config.is_development() {
        "RUNNING"
    } else if config.is_production() {
        "PRODUCTION"
    } else {
        "STARTING"
    };

    tracing::info!("==================================================");
    tracing::info!("  {} v{}", API_NAME.to_uppercase(), API_VERSION);
    tracing::info!("  Server status:  {}", status);
    tracing::info!("  Environment:    {}", config.environment.to_uppercase());
    tracing::info!("  Port:           {}", config.port);
    tracing::info!("  Local URL:      http://localhost:{}", config.port);
    tracing::info!("  Network URL:    http://{}:{}", config.host, config.port);
    tracing::info!("  Endpoints:");
    tracing::info!("    GET  /health   Health check");
    tracing::info!("    GET  /api      API info");
    tracing::info!("  Started at:     {}", chrono::Utc::now().to_rfc3339());
    tracing::info!("==================================================");

    if config.is_development() {
        tracing::info!("Development mode: verbose request tracing enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::db::memory::InMemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    const ADDR: &str = "0x04a3f5e6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4";
    const OTHER: &str = "0x0111111111111111111111111111111111111111111111111111111111111111";

    fn state(store: Arc<InMemoryStore>) -> AppState {
        let config = test_config("postgres://localhost/aqua_stark");
        let chain = DojoClient::from_config(&config);
        chain.initialize();
        AppState::new(store, Arc::new(chain), config)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn non_numeric_tank_id_is_rejected_without_querying() {
        let store = Arc::new(InMemoryStore::new());
        let app = build_router(state(store.clone()));

        let (status, body) = send(app, get_request("/api/tank/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "ValidationError");
        assert_eq!(body["error"]["message"], "Invalid tank ID format");
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn existing_tank_includes_fish_array() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_tank(1, ADDR, 10);
        store.insert_tank(2, OTHER, 10);
        store.insert_fish(5, ADDR, None);
        let app = build_router(state(store));

        let (status, body) = send(app.clone(), get_request("/api/tank/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["fish"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["fish"][0]["id"], 5);

        let (_, body) = send(app, get_request("/api/tank/2")).await;
        assert!(body["data"]["fish"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn player_lookup_maps_statuses() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_player(ADDR);
        let app = build_router(state(store));

        let (status, body) = send(app.clone(), get_request(&format!("/api/player/{ADDR}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["address"], ADDR);
        assert_eq!(body["data"]["fish_count"], 0);

        let (status, body) = send(app, get_request("/api/player/0x123")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid Starknet address format");
    }

    #[tokio::test]
    async fn store_failure_is_an_internal_error_envelope() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_with("pool timed out");
        let app = build_router(state(store));

        let (status, body) = send(app, get_request(&format!("/api/player/{ADDR}"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "InternalError");
        assert_eq!(body["error"]["code"], 500);
    }

    #[tokio::test]
    async fn unknown_route_answers_with_not_found_envelope() {
        let app = build_router(state(Arc::new(InMemoryStore::new())));
        let (status, body) = send(app, get_request("/api/aquarium")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "NotFoundError");
        assert_eq!(body["error"]["code"], 404);
    }

    #[tokio::test]
    async fn wrong_method_on_known_route_is_enveloped() {
        let app = build_router(state(Arc::new(InMemoryStore::new())));

        let (status, body) = send(app.clone(), get_request("/api/fish/mint")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "NotFoundError");
        assert_eq!(body["error"]["message"], "Route GET /api/fish/mint not found");
        assert_eq!(body["error"]["code"], 404);

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/tank/1")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "NotFoundError");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = build_router(state(Arc::new(InMemoryStore::new())));
        let request = Request::builder()
            .method("POST")
            .uri("/api/fish/feed")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "ValidationError");
    }

    #[tokio::test]
    async fn panics_become_unknown_error_envelopes() {
        async fn boom() -> &'static str {
            panic!("pump exploded")
        }

        let config = test_config("postgres://localhost/aqua_stark");
        let app = with_layers(api_routes().route("/boom", get(boom)), &config)
            .with_state(state(Arc::new(InMemoryStore::new())));

        let (status, body) = send(app, get_request("/boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "UnknownError");
        assert_eq!(body["error"]["message"], "An unexpected error occurred");
        assert!(!body.to_string().contains("pump exploded"));
    }

    #[tokio::test]
    async fn health_and_info_use_the_envelope() {
        let app = build_router(state(Arc::new(InMemoryStore::new())));

        let (status, body) = send(app.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["database"], "connected");
        assert_eq!(body["message"], "Operation successful");

        let (_, body) = send(app, get_request("/api")).await;
        assert_eq!(body["data"]["name"], API_NAME);
        assert_eq!(body["data"]["version"], API_VERSION);
    }

    #[tokio::test]
    async fn registration_shows_up_in_pending_sync_queue() {
        let store = Arc::new(InMemoryStore::new());
        let app = build_router(state(store));

        let (status, body) = send(
            app.clone(),
            post_json("/api/player/register", serde_json::json!({ "address": ADDR })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sync_status"], "pending");
        let tx_hash = body["data"]["tx_hash"].as_str().unwrap().to_string();

        let (_, body) = send(app.clone(), get_request("/api/sync/pending")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(app, get_request(&format!("/api/sync/{tx_hash}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["entity_id"], ADDR);
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/fish/feed")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_accepts_explicit_origins_with_credentials() {
        let mut config = test_config("postgres://localhost/aqua_stark");
        config.cors_origin = "http://localhost:5173".to_string();
        config.cors_credentials = true;
        let mut state = state(Arc::new(InMemoryStore::new()));
        state.config = config;
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(preflight("http://localhost:5173"))
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn cors_without_origins_allows_any_origin() {
        let mut state = state(Arc::new(InMemoryStore::new()));
        state.config.cors_origin = String::new();
        state.config.cors_credentials = false;
        let app = build_router(state);

        let response = app.oneshot(preflight("http://game.example")).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
