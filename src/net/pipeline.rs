//! The request pipeline: bearer attachment, dispatch, and one-shot
//! recovery.
//!
//! Every outbound call runs attach -> dispatch -> recover. On a
//! recoverable 401 the pipeline exchanges the refresh cookie for a new
//! access token, installs it, and replays the original request exactly
//! once, marked with [`RETRY_MARKER`]. A marked request that fails again
//! is terminal: token and snapshot are cleared before the redirect so
//! the UI never observes a half-authenticated state.
//!
//! Concurrent requests that fail simultaneously each run their own
//! refresh; the last installed token wins. Coalescing them behind a
//! shared in-flight future was considered and deliberately left out:
//! redundant refresh calls are harmless and the marker still bounds
//! every request to a single replay.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::net::classify::{
    ApiError, Classified, EndpointCategory, ErrorKind, MSG_SESSION_EXPIRED, MSG_UNEXPECTED,
    Recovery, categorize, classify,
};
use crate::net::http::{
    ApiRequest, ApiResponse, AUTHORIZATION, Method, RETRY_MARKER, Transport,
};
use crate::net::toast::success_message;
use crate::net::types::{Envelope, RefreshedToken};
use crate::state::alerts::Alerts;
use crate::state::notifications::NotificationFeed;
use crate::state::session::Session;
use crate::state::token::TokenStore;

/// Navigation sink, `window.location` in the browser.
pub type Navigator = Rc<dyn Fn(&str)>;
/// Fire-and-forget task sink, `spawn_local` in the browser.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

struct ClientInner {
    transport: Rc<dyn Transport>,
    token: TokenStore,
    session: Session,
    alerts: Alerts,
    feed: NotificationFeed,
    navigator: Navigator,
    spawner: Spawner,
}

/// Handle to the shared request pipeline and session state. Cloning is
/// cheap; all clones share one token store, session and alert queue.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

impl ApiClient {
    /// Build a client over an arbitrary transport. The navigator and
    /// spawner default to no-ops; tests and the browser entry point
    /// replace them.
    pub fn new(transport: Rc<dyn Transport>, token: TokenStore) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                transport,
                token,
                session: Session::new(),
                alerts: Alerts::new(),
                feed: NotificationFeed::new(),
                navigator: Rc::new(|route| log::debug!("navigate (noop): {route}")),
                spawner: Rc::new(|_| log::debug!("spawn (noop): task dropped")),
            }),
        }
    }

    pub fn with_navigator(self, navigator: impl Fn(&str) + 'static) -> Self {
        let inner = self.into_inner();
        Self {
            inner: Rc::new(ClientInner {
                navigator: Rc::new(navigator),
                ..inner
            }),
        }
    }

    pub fn with_spawner(self, spawner: impl Fn(LocalBoxFuture<'static, ()>) + 'static) -> Self {
        let inner = self.into_inner();
        Self {
            inner: Rc::new(ClientInner {
                spawner: Rc::new(spawner),
                ..inner
            }),
        }
    }

    fn into_inner(self) -> ClientInner {
        match Rc::try_unwrap(self.inner) {
            Ok(inner) => inner,
            Err(rc) => ClientInner {
                transport: rc.transport.clone(),
                token: rc.token.clone(),
                session: rc.session.clone(),
                alerts: rc.alerts.clone(),
                feed: rc.feed.clone(),
                navigator: rc.navigator.clone(),
                spawner: rc.spawner.clone(),
            },
        }
    }

    /// Fully wired browser client.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        Self::new(
            Rc::new(crate::net::http::FetchTransport),
            TokenStore::browser(),
        )
        .with_navigator(|route| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(route);
            }
        })
        .with_spawner(|fut| leptos::task::spawn_local(fut))
    }

    pub fn token(&self) -> &TokenStore {
        &self.inner.token
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn alerts(&self) -> &Alerts {
        &self.inner.alerts
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.inner.feed
    }

    /// Token presence only; says nothing about server-side validity.
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_set()
    }

    pub fn navigate(&self, route: &str) {
        (self.inner.navigator)(route);
    }

    pub(crate) fn spawn(&self, fut: LocalBoxFuture<'static, ()>) {
        (self.inner.spawner)(fut);
    }

    // =============================================================
    // Typed entry points
    // =============================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.dispatch(Method::Get, path, None).await?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        decode(self.dispatch(Method::Post, path, Some(body)).await?)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        decode(self.dispatch(Method::Put, path, Some(body)).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.dispatch(Method::Delete, path, None).await?)
    }

    /// GET where absence is expected; 404 becomes `Ok(None)`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        match self.dispatch(Method::Get, path, None).await {
            Ok(data) => decode(data).map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =============================================================
    // Core pipeline
    // =============================================================

    /// Run one logical call through attach -> dispatch -> recover,
    /// returning the unwrapped envelope `data`.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let category = categorize(path);
        let mut retried = false;

        loop {
            let mut req = ApiRequest::new(method, path);
            req.body = body.clone();
            // Bootstrap calls ride on the server-managed session cookie.
            req.credentials = category == EndpointCategory::AuthBootstrap;

            let token = self.inner.token.get();
            let has_token = token.is_some();
            if category != EndpointCategory::AuthBootstrap {
                if let Some(t) = &token {
                    req.set_header(AUTHORIZATION, format!("Bearer {t}"));
                }
            }
            if retried {
                req.set_header(RETRY_MARKER, "1");
            }

            log::debug!("{} {}", method.as_str(), path);
            let resp = self.inner.transport.send(req).await;

            if resp.is_success() {
                return Ok(self.finish_success(method, path, category, &resp));
            }

            let server_message = envelope_message(&resp.body);
            let classified = classify(
                resp.status,
                category,
                has_token,
                retried,
                server_message.as_deref(),
            );
            log::debug!(
                "{} {} failed with {}: {:?}",
                method.as_str(),
                path,
                resp.status,
                classified.kind
            );

            match classified.recovery {
                Recovery::RefreshAndRetry => match self.refresh().await {
                    Ok(new_token) => {
                        // Install before the replay so the retried
                        // request carries the fresh credential.
                        self.inner.token.set(&new_token);
                        retried = true;
                    }
                    Err(_) => {
                        return Err(self.terminal(resp.status, MSG_SESSION_EXPIRED));
                    }
                },
                Recovery::TerminalLogout => {
                    return Err(self.terminal(resp.status, &classified.message));
                }
                Recovery::None => {
                    return Err(self.surface(resp.status, &classified));
                }
            }
        }
    }

    /// Bootstrap call whose outcome nobody waits on (logout). No bearer,
    /// no recovery, no alert on failure.
    pub(crate) async fn fire_and_forget(&self, method: Method, path: &str) {
        let mut req = ApiRequest::new(method, path);
        req.credentials = true;
        log::debug!("{} {} (best effort)", method.as_str(), path);
        let resp = self.inner.transport.send(req).await;
        if !resp.is_success() {
            log::debug!("{path} failed with {} (ignored)", resp.status);
        }
    }

    /// Exchange the server-managed refresh cookie for a new access
    /// token. Bootstrap call: no bearer, no recovery, and the new token
    /// is returned rather than installed.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let mut req = ApiRequest::new(Method::Post, "/auth/refresh");
        req.credentials = true;

        log::debug!("POST /auth/refresh");
        let resp = self.inner.transport.send(req).await;
        if !resp.is_success() {
            log::debug!("refresh failed with {}", resp.status);
            return Err(ApiError::new(
                ErrorKind::AuthRejected,
                resp.status,
                MSG_SESSION_EXPIRED,
            ));
        }

        let env: Envelope<RefreshedToken> =
            serde_json::from_value(resp.body).map_err(|_| {
                ApiError::new(ErrorKind::Unknown, resp.status, MSG_UNEXPECTED)
            })?;
        env.data
            .map(|t| t.access_token)
            .ok_or_else(|| ApiError::new(ErrorKind::Unknown, resp.status, MSG_UNEXPECTED))
    }

    fn finish_success(
        &self,
        method: Method,
        path: &str,
        category: EndpointCategory,
        resp: &ApiResponse,
    ) -> Value {
        let env: Envelope<Value> =
            serde_json::from_value(resp.body.clone()).unwrap_or(Envelope {
                success: true,
                message: None,
                data: None,
            });
        let data = env.data.unwrap_or(Value::Null);

        if method.is_mutating() && category != EndpointCategory::AuthBootstrap {
            // Server message wins, then string payloads, then the table.
            let server_message = env
                .message
                .as_deref()
                .or_else(|| data.as_str());
            self.inner
                .alerts
                .success(success_message(method, path, server_message));
        }

        data
    }

    /// Terminal auth failure: clear token and snapshot first, then
    /// surface and redirect.
    fn terminal(&self, status: u16, message: &str) -> ApiError {
        log::warn!("terminal auth failure ({status}): logging out");
        self.inner.token.clear();
        self.inner.session.clear_user();
        self.inner.alerts.error(message);
        (self.inner.navigator)(crate::net::classify::LOGIN_ROUTE);
        ApiError::new(ErrorKind::AuthRejected, status, message)
    }

    /// Non-recoverable, non-terminal failure: toast (unless silent),
    /// optional redirect, and hand the error back to the caller.
    fn surface(&self, status: u16, classified: &Classified) -> ApiError {
        if !classified.silent {
            self.inner.alerts.error(classified.message.clone());
        }
        if let Some(route) = classified.redirect {
            (self.inner.navigator)(route);
        }
        ApiError::new(classified.kind, status, classified.message.clone())
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|_| ApiError::new(ErrorKind::ClientInput, 0, MSG_UNEXPECTED))
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| {
        log::warn!("response decode failed: {e}");
        ApiError::new(ErrorKind::Unknown, 200, MSG_UNEXPECTED)
    })
}

fn envelope_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
