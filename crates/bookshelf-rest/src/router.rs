//! Main application router.

use crate::{
    controllers::{book_controller, health_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use bookshelf_config::ServerConfig;
use bookshelf_repository::DatabasePoolInterface;
use bookshelf_service::{BookService, QueryCacheInterface};
use shaku::{HasComponent, Module};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the application router from a Shaku module.
///
/// The module must provide the book service, the query cache and the
/// database pool.
pub fn create_router_from_module<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module
        + HasComponent<dyn BookService>
        + HasComponent<dyn QueryCacheInterface>
        + HasComponent<dyn DatabasePoolInterface>,
{
    create_router(AppState::from_module(module), server_config)
}

/// Creates the application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new().nest("/books", book_controller::router());

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Bookshelf API"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{CacheHealthResponse, ReadinessResponse};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use bookshelf_core::{
        Book, BookFilter, BookId, BookshelfError, BookshelfResult, ErrorResponse, HealthCheck,
        HealthStatus,
    };
    use bookshelf_repository::BookRepository;
    use bookshelf_service::{BookCachePolicy, BookServiceComponent, InMemoryHashStore, QueryCache};
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct TestBookRepository {
        books: Mutex<Vec<Book>>,
        reads: AtomicUsize,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl BookRepository for TestBookRepository {
        async fn find(&self, filter: &BookFilter) -> BookshelfResult<Vec<Book>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .books
                .lock()
                .unwrap()
                .iter()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: BookId) -> BookshelfResult<Option<Book>> {
            Ok(self.books.lock().unwrap().iter().find(|b| b.id == id).cloned())
        }

        async fn save(&self, book: &Book) -> BookshelfResult<Book> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(BookshelfError::Database("connection lost".to_string()));
            }
            self.books.lock().unwrap().push(book.clone());
            Ok(book.clone())
        }
    }

    struct StaticHealthCheck(HealthStatus);

    #[async_trait]
    impl HealthCheck for StaticHealthCheck {
        fn name(&self) -> &str {
            "static"
        }

        async fn check(&self) -> HealthStatus {
            self.0.clone()
        }
    }

    struct TestApp {
        router: Router,
        repo: Arc<TestBookRepository>,
    }

    fn app_with(health: HealthStatus) -> TestApp {
        let repo = Arc::new(TestBookRepository::default());
        let cache: Arc<dyn QueryCacheInterface> =
            Arc::new(QueryCache::new(Arc::new(InMemoryHashStore::new())));
        let service = Arc::new(BookServiceComponent::new(
            repo.clone(),
            cache.clone(),
            BookCachePolicy::default(),
        ));
        let checks: Vec<Arc<dyn HealthCheck>> = vec![Arc::new(StaticHealthCheck(health))];
        let state = AppState::new(service, cache, checks);

        TestApp {
            router: create_router(state, &ServerConfig::default()),
            repo,
        }
    }

    fn app() -> TestApp {
        app_with(HealthStatus::Healthy)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(router, request).await
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_returns_bare_array() {
        let app = app();
        let (status, body) = get(&app.router, "/api/books").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<serde_json::Value>(&body), serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let app = app();

        let (status, body) = post_json(
            &app.router,
            "/api/books",
            r#"{"title":"Dune","content":"Spice","author":"Frank Herbert"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: Book = parse(&body);
        assert_eq!(created.title, "Dune");

        let (_, body) = get(&app.router, "/api/books").await;
        let books: Vec<Book> = parse(&body);
        assert_eq!(books, vec![created.clone()]);

        let (status, body) = get(&app.router, &format!("/api/books/{}", created.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<Book>(&body), created);
    }

    #[tokio::test]
    async fn test_list_by_author_is_cached() {
        let app = app();
        post_json(&app.router, "/api/books", r#"{"title":"Dune","author":"Frank Herbert"}"#)
            .await;
        post_json(&app.router, "/api/books", r#"{"title":"Solaris","author":"Stanislaw Lem"}"#)
            .await;

        for _ in 0..3 {
            let (status, body) = get(&app.router, "/api/books?author=Stanislaw%20Lem").await;
            assert_eq!(status, StatusCode::OK);
            let books: Vec<Book> = parse(&body);
            assert_eq!(books.len(), 1);
            assert_eq!(books[0].title, "Solaris");
        }
        assert_eq!(app.repo.reads.load(Ordering::SeqCst), 1);

        let (_, body) = get(&app.router, "/health/cache").await;
        let cache: CacheHealthResponse = parse(&body);
        assert!(cache.enabled);
        assert_eq!(cache.stats.hits, 2);
        assert_eq!(cache.stats.misses, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let app = app();

        let (status, body) =
            post_json(&app.router, "/api/books", r#"{"title":"","author":"Someone"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse::<ErrorResponse>(&body).code, "VALIDATION_ERROR");

        let (status, _) = post_json(&app.router, "/api/books", "[1, 2]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.repo.books.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_bad_request() {
        let app = app();
        app.repo.fail_saves.store(true, Ordering::SeqCst);

        let (status, body) =
            post_json(&app.router, "/api/books", r#"{"title":"Dune","author":"Frank Herbert"}"#)
                .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse::<ErrorResponse>(&body).code, "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_get_book_errors() {
        let app = app();

        let (status, _) = get(&app.router, "/api/books/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(&app.router, &format!("/api/books/{}", BookId::new())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(parse::<ErrorResponse>(&body).code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();

        let (status, _) = get(&app.router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&app.router, "/live").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&app.router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<ReadinessResponse>(&body).status, "ready");
    }

    #[tokio::test]
    async fn test_ready_tolerates_degraded() {
        let app = app_with(HealthStatus::Degraded("Cache disabled".to_string()));
        let (status, body) = get(&app.router, "/ready").await;

        assert_eq!(status, StatusCode::OK);
        let readiness: ReadinessResponse = parse(&body);
        assert_eq!(readiness.checks[0].status, "degraded");
    }

    #[tokio::test]
    async fn test_ready_fails_when_unhealthy() {
        let app = app_with(HealthStatus::Unhealthy("connection refused".to_string()));
        let (status, body) = get(&app.router, "/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let readiness: ReadinessResponse = parse(&body);
        assert_eq!(readiness.status, "not_ready");
        assert_eq!(readiness.checks[0].message.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }
}
