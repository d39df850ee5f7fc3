//! Error classification: the single source of truth for what a failed
//! response means and what the pipeline does about it.
//!
//! `classify` is a pure function over `(status, endpoint category, token
//! presence, retry marker, server message)`. UI code never interprets raw
//! status codes; it renders the message and kind carried on [`ApiError`].

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use thiserror::Error;

/// Route used when recovery gives up on the session.
pub const LOGIN_ROUTE: &str = "/auth/login";
/// Safe default route for permission failures.
pub const HOME_ROUTE: &str = "/";
/// Route for missing primary entities.
pub const NOT_FOUND_ROUTE: &str = "/not-found";

/// Coarse endpoint categories the routing table distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointCategory {
    /// Login/register/refresh/logout. Never decorated with a bearer
    /// token and never recovered (a stale token must not leak into a
    /// login attempt, and the refresh call must not refresh itself).
    AuthBootstrap,
    /// The `/auth/me` probe used to validate a token.
    WhoAmI,
    /// Lookups where absence is normal (avatars); 404 is silent.
    OptionalResource,
    /// Single-entity lookups (post/comment/user by id); 404 redirects
    /// to the not-found page.
    PrimaryEntity,
    General,
}

/// Split an API path into its category. Query strings are ignored.
pub fn categorize(path: &str) -> EndpointCategory {
    let path = path.split('?').next().unwrap_or(path);

    const BOOTSTRAP: [&str; 4] = [
        "/auth/login",
        "/auth/register",
        "/auth/refresh",
        "/auth/logout",
    ];
    if BOOTSTRAP.iter().any(|p| path.contains(p)) {
        return EndpointCategory::AuthBootstrap;
    }
    if path.contains("/auth/me") {
        return EndpointCategory::WhoAmI;
    }
    if path.contains("/avatar") {
        return EndpointCategory::OptionalResource;
    }

    // Exactly `/posts/{id}`, `/comments/{id}` or `/users/{id}`.
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() == 2
        && matches!(segments[0], "posts" | "comments" | "users")
        && segments[1].chars().all(|c| c.is_ascii_digit())
        && !segments[1].is_empty()
    {
        return EndpointCategory::PrimaryEntity;
    }

    EndpointCategory::General
}

/// Error taxonomy surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400: bad client input, not recoverable.
    ClientInput,
    /// 401 with a token and no retry marker: recoverable via refresh.
    AuthExpired,
    /// 401 with no token, or after a failed refresh: terminal.
    AuthRejected,
    /// 403 outside the who-am-I probe.
    PermissionDenied,
    NotFound,
    Conflict,
    Validation,
    /// 5xx.
    Server,
    /// Status 0: the network was unreachable.
    Network,
    /// Anything else, including response bodies that fail to decode.
    Unknown,
}

/// What the pipeline should do next for a failed response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Surface the error; no replay, no session teardown.
    None,
    /// Exchange the refresh credential for a new access token and replay
    /// the original request once.
    RefreshAndRetry,
    /// Clear token and snapshot, then redirect to login.
    TerminalLogout,
}

/// Full disposition for one failed response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub kind: ErrorKind,
    pub recovery: Recovery,
    pub redirect: Option<&'static str>,
    /// Canonical human-readable message, always present.
    pub message: String,
    /// Silent dispositions produce no toast (the caller or the redirect
    /// target is the surface instead).
    pub silent: bool,
}

pub const MSG_OFFLINE: &str =
    "Unable to connect to server. Please check your internet connection.";
pub const MSG_BAD_REQUEST: &str = "Invalid request. Please check your input.";
pub const MSG_LOG_IN: &str = "Please log in to continue.";
pub const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const MSG_FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const MSG_NOT_FOUND: &str = "Resource not found.";
pub const MSG_CONFLICT: &str = "This action conflicts with existing data.";
pub const MSG_VALIDATION: &str = "Validation failed. Please review your input.";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";
pub const MSG_AUTH_FAILED: &str = "Authentication failed. Please check your credentials.";

fn or_generic(server_message: Option<&str>, generic: &str) -> String {
    match server_message {
        Some(m) if !m.trim().is_empty() => m.to_owned(),
        _ => generic.to_owned(),
    }
}

fn plain(kind: ErrorKind, message: String) -> Classified {
    Classified {
        kind,
        recovery: Recovery::None,
        redirect: None,
        message,
        silent: false,
    }
}

fn terminal(message: &str) -> Classified {
    Classified {
        kind: ErrorKind::AuthRejected,
        recovery: Recovery::TerminalLogout,
        redirect: Some(LOGIN_ROUTE),
        message: message.to_owned(),
        silent: false,
    }
}

fn refreshable() -> Classified {
    Classified {
        kind: ErrorKind::AuthExpired,
        recovery: Recovery::RefreshAndRetry,
        redirect: None,
        message: MSG_SESSION_EXPIRED.to_owned(),
        silent: true,
    }
}

/// Map one failed response to its disposition.
///
/// `has_token` is whether a bearer token was available when the request
/// was dispatched; `retried` is whether the request already carried the
/// retry marker (i.e. it was a replay).
pub fn classify(
    status: u16,
    category: EndpointCategory,
    has_token: bool,
    retried: bool,
    server_message: Option<&str>,
) -> Classified {
    match status {
        0 => plain(ErrorKind::Network, MSG_OFFLINE.to_owned()),

        400 => plain(
            ErrorKind::ClientInput,
            or_generic(server_message, MSG_BAD_REQUEST),
        ),

        401 | 403 if category == EndpointCategory::WhoAmI => {
            if retried {
                terminal(MSG_SESSION_EXPIRED)
            } else {
                refreshable()
            }
        }

        // Bootstrap calls are excluded from recovery entirely: a failed
        // login stays a failed login.
        401 if category == EndpointCategory::AuthBootstrap => plain(
            ErrorKind::AuthRejected,
            or_generic(server_message, MSG_AUTH_FAILED),
        ),

        401 => {
            if !has_token {
                // Nothing to refresh.
                terminal(MSG_LOG_IN)
            } else if retried {
                terminal(MSG_SESSION_EXPIRED)
            } else {
                refreshable()
            }
        }

        403 if category == EndpointCategory::AuthBootstrap => plain(
            ErrorKind::PermissionDenied,
            or_generic(server_message, MSG_FORBIDDEN),
        ),

        403 => Classified {
            kind: ErrorKind::PermissionDenied,
            recovery: Recovery::None,
            redirect: Some(HOME_ROUTE),
            message: MSG_FORBIDDEN.to_owned(),
            silent: false,
        },

        404 => match category {
            EndpointCategory::OptionalResource => Classified {
                kind: ErrorKind::NotFound,
                recovery: Recovery::None,
                redirect: None,
                message: MSG_NOT_FOUND.to_owned(),
                silent: true,
            },
            EndpointCategory::PrimaryEntity => Classified {
                kind: ErrorKind::NotFound,
                recovery: Recovery::None,
                redirect: Some(NOT_FOUND_ROUTE),
                // The not-found page is the surface; no toast on top.
                message: MSG_NOT_FOUND.to_owned(),
                silent: true,
            },
            _ => plain(ErrorKind::NotFound, MSG_NOT_FOUND.to_owned()),
        },

        409 => plain(
            ErrorKind::Conflict,
            or_generic(server_message, MSG_CONFLICT),
        ),

        422 => plain(
            ErrorKind::Validation,
            or_generic(server_message, MSG_VALIDATION),
        ),

        s if s >= 500 => plain(ErrorKind::Server, MSG_SERVER.to_owned()),

        s if (400..500).contains(&s) => plain(
            ErrorKind::Unknown,
            or_generic(server_message, MSG_UNEXPECTED),
        ),

        _ => plain(ErrorKind::Unknown, MSG_UNEXPECTED.to_owned()),
    }
}

/// Error returned to callers for every non-recovered failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    /// Failures that are normal for optional lookups.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_auth(&self) -> bool {
        matches!(self.kind, ErrorKind::AuthExpired | ErrorKind::AuthRejected)
    }
}
