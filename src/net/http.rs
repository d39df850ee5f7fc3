//! HTTP transport seam.
//!
//! The pipeline never talks to the browser directly; it builds an
//! [`ApiRequest`], hands it to a [`Transport`], and gets back an
//! [`ApiResponse`]. The real browser transport (`FetchTransport`, via
//! `gloo-net`) is gated behind `hydrate`; tests drive the pipeline with a
//! scripted transport instead.

use futures::future::LocalBoxFuture;
use serde_json::Value;

/// Prefix for all backend API paths.
pub const API_BASE: &str = "/api";

/// Single-use marker header set on a replayed request. A response that
/// fails again with this header present is terminal, never replayed.
pub const RETRY_MARKER: &str = "x-moblog-retry";

/// Bearer credential header.
pub const AUTHORIZATION: &str = "authorization";

/// HTTP methods used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Mutating methods get a success toast; reads never do.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Method::Get)
    }
}

/// One logical outbound call, including at most one replay.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to [`API_BASE`], e.g. `/posts/42`.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Send browser-managed cookies (used only by the refresh exchange).
    pub credentials: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            credentials: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value.into();
        } else {
            self.headers.push((name.to_owned(), value.into()));
        }
    }
}

/// What came back: status plus parsed JSON body (`Null` when the body is
/// empty or unparseable). Status `0` means the network was unreachable.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract request dispatcher. Implemented by the browser fetch layer
/// and by scripted transports in tests.
pub trait Transport {
    fn send(&self, req: ApiRequest) -> LocalBoxFuture<'_, ApiResponse>;
}

/// Transport for environments with no network (server-side rendering).
/// Every call reports the network as unreachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, _req: ApiRequest) -> LocalBoxFuture<'_, ApiResponse> {
        Box::pin(async {
            ApiResponse {
                status: 0,
                body: Value::Null,
            }
        })
    }
}

/// Browser transport backed by `gloo-net`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

#[cfg(feature = "hydrate")]
impl Transport for FetchTransport {
    fn send(&self, req: ApiRequest) -> LocalBoxFuture<'_, ApiResponse> {
        Box::pin(async move {
            let url = format!("{API_BASE}{}", req.path);
            let method = match req.method {
                Method::Get => gloo_net::http::Method::GET,
                Method::Post => gloo_net::http::Method::POST,
                Method::Put => gloo_net::http::Method::PUT,
                Method::Patch => gloo_net::http::Method::PATCH,
                Method::Delete => gloo_net::http::Method::DELETE,
            };

            let mut builder = gloo_net::http::RequestBuilder::new(&url).method(method);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            if req.credentials {
                builder = builder.credentials(web_sys::RequestCredentials::Include);
            }

            let built = match req.body {
                Some(ref body) => builder.json(body),
                None => builder.build(),
            };
            let request = match built {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("request build failed for {url}: {e}");
                    return ApiResponse {
                        status: 0,
                        body: Value::Null,
                    };
                }
            };

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
                    ApiResponse { status, body }
                }
                // Fetch rejects only on network-level failure.
                Err(e) => {
                    log::warn!("network unreachable for {url}: {e}");
                    ApiResponse {
                        status: 0,
                        body: Value::Null,
                    }
                }
            }
        })
    }
}
