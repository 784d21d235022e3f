//! Static file server with caching disabled.
//!
//! Every request path is mapped onto the serve root (query string and
//! fragment stripped, `..` refused) and answered with `tower-http`'s file
//! service. Three header layers force every response, errors included, to be
//! uncacheable so the browser always sees the latest build output.

use crate::error::{CliError, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::set_header::SetResponseHeaderLayer;

/// `Cache-Control` value sent with every response.
pub const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate, max-age=0";
/// `Pragma` value for HTTP/1.0 caches.
pub const PRAGMA_VALUE: &str = "no-cache";
/// `Expires` value: already expired.
pub const EXPIRES_VALUE: &str = "0";

/// Why a request path could not be mapped into the serve root.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("path escapes the serve root")]
    Traversal,
}

/// Map a request target onto a file path under `root`.
///
/// The query string and fragment are dropped, the rest is split on `/`, each
/// segment is percent-decoded and pushed onto `root`. Empty and `.` segments
/// are skipped. A `..` segment, or a segment that decodes to something
/// containing a path separator, is refused.
///
/// ```
/// use devloop_cli::dev::resolve_path;
/// use std::path::{Path, PathBuf};
///
/// let path = resolve_path(Path::new("/srv"), "/app.js?v=123#frag").unwrap();
/// assert_eq!(path, PathBuf::from("/srv/app.js"));
/// ```
pub fn resolve_path(root: &Path, target: &str) -> Result<PathBuf, ResolveError> {
    let target = target.split('?').next().unwrap_or_default();
    let target = target.split('#').next().unwrap_or_default();

    let mut resolved = root.to_path_buf();
    for segment in target.split('/') {
        let decoded = percent_decode_str(segment).decode_utf8_lossy();
        match decoded.as_ref() {
            "" | "." => continue,
            ".." => return Err(ResolveError::Traversal),
            name if name.contains(['/', '\\', '\0']) || Path::new(name).has_root() => {
                return Err(ResolveError::Traversal);
            }
            name => resolved.push(name),
        }
    }

    Ok(resolved)
}

#[derive(Clone)]
struct StaticRoot(Arc<PathBuf>);

/// Build the router serving `root`.
///
/// Request logging is off unless `log_requests` is set.
pub fn static_router(root: PathBuf, log_requests: bool) -> Router {
    let router = Router::new()
        .fallback(serve_static)
        .with_state(StaticRoot(Arc::new(root)));

    let router = if log_requests {
        router.layer(middleware::from_fn(log_request))
    } else {
        router
    };

    router
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static(PRAGMA_VALUE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static(EXPIRES_VALUE),
        ))
}

async fn serve_static(State(StaticRoot(root)): State<StaticRoot>, request: Request) -> Response {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let path = match resolve_path(&root, target) {
        Ok(path) => path,
        Err(err) => {
            tracing::debug!(uri = target, "Refused request: {}", err);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    };

    let is_dir = tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    let path = if is_dir {
        // Directories need a trailing slash so relative links in index.html resolve.
        let uri_path = request.uri().path();
        if !uri_path.ends_with('/') {
            let location = match request.uri().query() {
                Some(query) => format!("{}/?{}", uri_path, query),
                None => format!("{}/", uri_path),
            };
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }
        path.join("index.html")
    } else {
        path
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(%method, %path, status = response.status().as_u16(), "request");
    response
}

/// HTTP listener bound to its address, ready to serve.
pub struct DevServer {
    listener: TcpListener,
    app: Router,
}

impl DevServer {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Server`] if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, app: Router) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;
        Ok(Self { listener, app })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` flips to `true`, then stop accepting and let
    /// in-flight requests finish.
    pub async fn serve(self, shutdown: watch::Receiver<bool>) -> Result<()> {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(super::shutdown_requested(shutdown))
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    }
}
