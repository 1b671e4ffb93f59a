use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde_json::json;
use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

use crate::telemetry::{LogLevel, Logger, DEFAULT_LOG_LEVEL};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SITE_DIR: &str = "dist";
const NOT_FOUND_PAGE: &str = "404.html";
const REQUEST_ID_HEADER: &str = "x-request-id";

const PORT_BOUNDS: (u16, u16) = (1, u16::MAX);

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("site directory {} not found; build the site or set SITE_DIR", .0.display())]
    MissingSiteDir(PathBuf),

    #[error("could not bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub site_dir: PathBuf,
    pub log_level: LogLevel,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|value| (PORT_BOUNDS.0..=PORT_BOUNDS.1).contains(value))
            .unwrap_or(DEFAULT_PORT);
        let site_dir = non_empty(lookup("SITE_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_DIR));
        let log_level = non_empty(lookup("LOG_LEVEL"))
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            site_dir,
            log_level,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub async fn run() -> Result<(), ServerError> {
    serve(ServerConfig::from_env()).await
}

pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    if !config.site_dir.is_dir() {
        return Err(ServerError::MissingSiteDir(config.site_dir));
    }

    let logger = Logger::new(config.log_level);
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    logger.info(
        "server_listening",
        json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "site_dir": config.site_dir.display().to_string(),
        }),
    );

    axum::serve(listener, router(&config, logger))
        .await
        .map_err(ServerError::Serve)
}

pub fn router(config: &ServerConfig, logger: Logger) -> Router {
    let not_found = ServeFile::new(config.site_dir.join(NOT_FOUND_PAGE));
    let site = ServeDir::new(&config.site_dir).not_found_service(not_found);

    Router::new()
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(logger, log_requests))
}

async fn log_requests(State(logger): State<Logger>, request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    let level = if status.is_server_error() {
        LogLevel::Warn
    } else {
        LogLevel::Info
    };
    logger.event(
        level,
        "request_completed",
        json!({
            "request_id": request_id,
            "method": method.as_str(),
            "path": path,
            "status": status.as_u16(),
            "status_class": status_class(status),
            "duration_ms": started.elapsed().as_millis() as u64,
        }),
    );

    response
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn site_config() -> ServerConfig {
        ServerConfig {
            port: 0,
            site_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("site"),
            log_level: LogLevel::Warn,
        }
    }

    async fn spawn_preview() -> SocketAddr {
        let config = site_config();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral port binds");
        let address = listener.local_addr().expect("bound address");
        let app = router(&config, Logger::new(config.log_level));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        address
    }

    #[test]
    fn config_falls_back_to_defaults() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.site_dir, PathBuf::from(DEFAULT_SITE_DIR));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn config_reads_overrides_and_rejects_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", " 9000 "),
            ("SITE_DIR", "site"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.site_dir, PathBuf::from("site"));
        assert_eq!(config.log_level, LogLevel::Debug);

        let env: HashMap<&str, &str> =
            HashMap::from([("PORT", "0"), ("SITE_DIR", "   "), ("LOG_LEVEL", "loud")]);
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.site_dir, PathBuf::from(DEFAULT_SITE_DIR));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn request_id_prefers_incoming_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  abc-123 "));
        assert_eq!(resolve_request_id(&headers), "abc-123");

        let generated = resolve_request_id(&HeaderMap::new());
        assert!(generated.starts_with("req-"));
        assert_ne!(generated, resolve_request_id(&HeaderMap::new()));
    }

    #[test]
    fn status_classes_cover_each_family() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::MOVED_PERMANENTLY), "3xx");
        assert_eq!(status_class(StatusCode::NOT_FOUND), "4xx");
        assert_eq!(status_class(StatusCode::BAD_GATEWAY), "5xx");
        assert_eq!(status_class(StatusCode::SWITCHING_PROTOCOLS), "other");
    }

    #[tokio::test]
    async fn serve_refuses_missing_site_dir() {
        let config = ServerConfig {
            site_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("no-such-site"),
            ..site_config()
        };

        let result = serve(config).await;
        assert!(matches!(result, Err(ServerError::MissingSiteDir(_))));
    }

    #[tokio::test]
    async fn root_serves_home_page() {
        let address = spawn_preview().await;

        let response = reqwest::get(format!("http://{address}/"))
            .await
            .expect("request succeeds");
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = response.text().await.expect("body is text");
        assert!(body.contains("data-page=\"home\""));
    }

    #[tokio::test]
    async fn unknown_path_serves_not_found_page_with_404() {
        let address = spawn_preview().await;

        let response = reqwest::Client::new()
            .get(format!("http://{address}/does/not/exist"))
            .header(REQUEST_ID_HEADER, "trace-42")
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("trace-42")
        );

        let body = response.text().await.expect("body is text");
        assert!(body.contains("data-page=\"not-found\""));
    }
}
