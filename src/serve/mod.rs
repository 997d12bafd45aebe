//! HTTP transport adapter.
//!
//! A hyper front-end over the dispatch layer: parses each incoming
//! request into a [`Request`](crate::request::Request), recognizes the
//! route, dispatches, and converts the outcome into an HTTP response.
//! Redirects default to 302 here; dispatch errors become 500s and
//! unmatched routes 404s. Cancellation and connection aborts are hyper's
//! concern, not the dispatch layer's.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::application::Application;
use crate::dispatch::{dispatch, DispatchOutcome};
use crate::error::ServeError;
use crate::request::Request;
use crate::router::RouteSet;

const REDIRECT_DEFAULT_STATUS: u16 = 302;

/// A configured HTTP server for one application and route set.
pub struct Server {
    app: Arc<Application>,
    routes: Arc<RouteSet>,
}

impl Server {
    pub fn new(app: Arc<Application>, routes: RouteSet) -> Self {
        Self {
            app,
            routes: Arc::new(routes),
        }
    }

    /// Serve forever on `port`. Builds its own tokio runtime and blocks
    /// the calling thread.
    pub fn run(self, port: u16) -> Result<(), ServeError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ServeError::Runtime)?;

        runtime.block_on(async move {
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| ServeError::Bind { port, source })?;

            println!("Server listening on http://0.0.0.0:{}", port);
            println!(
                "Dispatching {} route(s) across {} controller(s)\n",
                self.routes.routes().len(),
                self.app.controller_names().count()
            );

            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => continue,
                };
                let io = TokioIo::new(stream);
                let app = self.app.clone();
                let routes = self.routes.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let app = app.clone();
                        let routes = routes.clone();
                        async move { handle(app, routes, req).await }
                    });

                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        eprintln!("Connection error: {}", e);
                    }
                });
            }
        })
    }
}

/// Handle one HTTP request: recognize, dispatch, convert.
async fn handle(
    app: Arc<Application>,
    routes: Arc<RouteSet>,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let (parts, incoming) = req.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().unwrap_or("").to_string();

    let recognition = match routes.recognize(&method, &path) {
        Some(hit) => hit,
        None => {
            return Ok(plain_response(
                StatusCode::NOT_FOUND,
                format!("No route matches {} {}", method, path),
            ))
        }
    };

    let mut request = Request::new(&method, &path);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            request.set_header(name.as_str(), value);
        }
    }

    // Route params first, then query params, then form-encoded body
    // fields; later sources override earlier ones on name collisions.
    for (name, value) in recognition.params {
        request.set_param(name, Value::String(value));
    }
    for (name, value) in parse_urlencoded(&query) {
        request.set_param(name, value);
    }

    let body = incoming.collect().await?.to_bytes();
    let body = String::from_utf8_lossy(&body).to_string();
    if request
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    {
        for (name, value) in parse_urlencoded(&body) {
            request.set_param(name, value);
        }
    }
    request.set_body(body);

    let outcome = dispatch(&app, &recognition.controller, &recognition.action, request);
    Ok(outcome_response(&method, &path, outcome))
}

/// Parse a URL-encoded `a=1&b=two` string into params.
fn parse_urlencoded(input: &str) -> IndexMap<String, Value> {
    let mut params = IndexMap::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        };
        let name = urlencoding::decode(name).unwrap_or_default().into_owned();
        let value = urlencoding::decode(value).unwrap_or_default().into_owned();
        if !name.is_empty() {
            params.insert(name, Value::String(value));
        }
    }
    params
}

/// Convert a dispatch outcome into an HTTP response.
fn outcome_response(
    method: &str,
    path: &str,
    outcome: DispatchOutcome,
) -> hyper::Response<Full<Bytes>> {
    match outcome {
        DispatchOutcome::Completed(res) => {
            if let Some((url, status)) = res.redirection() {
                let status = status.unwrap_or(REDIRECT_DEFAULT_STATUS);
                let mut builder = hyper::Response::builder()
                    .status(StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND))
                    .header("location", url);
                for (name, value) in res.headers() {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                return builder
                    .body(Full::new(Bytes::new()))
                    .unwrap_or_else(|_| plain_response(StatusCode::FOUND, String::new()));
            }

            let mut builder = hyper::Response::builder()
                .status(StatusCode::from_u16(res.status()).unwrap_or(StatusCode::OK));
            if res.rendered_view().is_some() {
                builder = builder.header("content-type", "text/html; charset=utf-8");
            }
            for (name, value) in res.headers() {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder
                .body(Full::new(Bytes::from(res.body().to_string())))
                .unwrap_or_else(|_| plain_response(StatusCode::OK, String::new()))
        }
        DispatchOutcome::Errored(err) => {
            eprintln!("Error dispatching {} {}: {}", method, path, err);
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
        }
    }
}

fn plain_response(status: StatusCode, body: String) -> hyper::Response<Full<Bytes>> {
    let mut response = hyper::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerDefinition;
    use crate::error::{ControllerError, FrameworkError};
    use crate::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_urlencoded() {
        let params = parse_urlencoded("q=hello%20world&page=2&flag");
        assert_eq!(params.get("q"), Some(&json!("hello world")));
        assert_eq!(params.get("page"), Some(&json!("2")));
        assert_eq!(params.get("flag"), Some(&json!("")));
    }

    #[test]
    fn test_parse_urlencoded_empty_input() {
        assert!(parse_urlencoded("").is_empty());
    }

    #[test]
    fn test_redirect_defaults_to_302() {
        let mut res = Response::new();
        res.redirect("/login", None);
        let http = outcome_response("GET", "/posts", DispatchOutcome::Completed(res));
        assert_eq!(http.status(), StatusCode::FOUND);
        assert_eq!(http.headers()["location"], "/login");
    }

    #[test]
    fn test_redirect_with_explicit_status_forwards_it() {
        let mut res = Response::new();
        res.redirect("http://x/", Some(303));
        let http = outcome_response("GET", "/posts", DispatchOutcome::Completed(res));
        assert_eq!(http.status(), StatusCode::SEE_OTHER);
        assert_eq!(http.headers()["location"], "http://x/");
    }

    #[test]
    fn test_completed_response_carries_body_and_headers() {
        let mut res = Response::new();
        res.set_body("<h1>ok</h1>");
        res.set_header("x-powered-by", "roundhouse");
        let http = outcome_response("GET", "/posts", DispatchOutcome::Completed(res));
        assert_eq!(http.status(), StatusCode::OK);
        assert_eq!(http.headers()["x-powered-by"], "roundhouse");
    }

    #[test]
    fn test_errored_outcome_is_a_500() {
        let err: FrameworkError = ControllerError::filter("boom").into();
        let http = outcome_response("GET", "/posts", DispatchOutcome::Errored(err));
        assert_eq!(http.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_recognized_route_dispatches_with_captured_params() {
        let app = Application::builder()
            .controller(
                "posts",
                ControllerDefinition::new().action("show", |ctx| {
                    let id = ctx.params("id", json!(null));
                    ctx.redirect(&format!("/posts/{}/comments", id.as_str().unwrap_or("")));
                    Ok(())
                }),
            )
            .build();
        let routes = RouteSet::new().resource("posts");

        let recognition = routes.recognize("GET", "/posts/42").unwrap();
        let mut request = Request::new("GET", "/posts/42");
        for (name, value) in recognition.params {
            request.set_param(name, Value::String(value));
        }

        let outcome = dispatch(&app, &recognition.controller, &recognition.action, request);
        let http = outcome_response("GET", "/posts/42", outcome);
        assert_eq!(http.status(), StatusCode::FOUND);
        assert_eq!(http.headers()["location"], "/posts/42/comments");
    }

    #[test]
    fn test_unmatched_route_is_a_404() {
        let routes = RouteSet::new().resource("posts");
        assert!(routes.recognize("GET", "/comments").is_none());
        let http = plain_response(StatusCode::NOT_FOUND, "No route".to_string());
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
    }
}
