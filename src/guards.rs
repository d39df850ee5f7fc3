//! Route guard decisions.
//!
//! Guards are pure over the token store (plus one async probe for the
//! guest guard); `app` maps the outcomes onto navigation. Keeping them
//! off the router makes every branch testable without a browser.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use crate::net::classify::{HOME_ROUTE, LOGIN_ROUTE};
use crate::net::pipeline::ApiClient;
use crate::state::token::TokenStore;
use crate::util::jwt;

/// Posts feed, where non-admins land when an admin route rejects them.
pub const POSTS_ROUTE: &str = "/posts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(&'static str),
}

/// Authenticated-only routes. `/auth/*` targets are always allowed so
/// the login flow itself is reachable.
pub fn check_auth(token: &TokenStore, target: &str) -> GuardOutcome {
    if target.starts_with("/auth") {
        return GuardOutcome::Allow;
    }
    if token.is_set() {
        GuardOutcome::Allow
    } else {
        GuardOutcome::Redirect(LOGIN_ROUTE)
    }
}

/// Admin-only routes: requires a token whose `role` claim is an admin
/// role. Non-admins are sent to the posts feed, not to login.
pub fn check_admin(token: &TokenStore) -> GuardOutcome {
    let Some(token) = token.get() else {
        return GuardOutcome::Redirect(LOGIN_ROUTE);
    };
    match jwt::role_claim(&token).as_deref() {
        Some("ADMIN" | "ROLE_ADMIN") => GuardOutcome::Allow,
        _ => GuardOutcome::Redirect(POSTS_ROUTE),
    }
}

/// Guest-only routes (login/register). A stored token is only trusted
/// after the who-am-I probe confirms it; a stale token falls through to
/// Allow so a logged-out user is never locked out of the login page.
pub async fn check_guest(client: &ApiClient) -> GuardOutcome {
    if !client.is_authenticated() {
        return GuardOutcome::Allow;
    }
    match client.fetch_current_user().await {
        Ok(_) => GuardOutcome::Redirect(HOME_ROUTE),
        Err(_) => GuardOutcome::Allow,
    }
}
