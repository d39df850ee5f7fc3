use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use serde_json::{Value, json};

use super::*;
use crate::net::http::{ApiRequest, ApiResponse, Transport};
use crate::state::token::MemoryCache;

fn store_with(token: Option<&str>) -> TokenStore {
    let cache = match token {
        Some(t) => MemoryCache::with_token(t),
        None => MemoryCache::default(),
    };
    TokenStore::new(Rc::new(cache))
}

fn token_with_role(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(json!({ "sub": "7", "role": role }).to_string());
    format!("{header}.{body}.sig")
}

// =============================================================
// Auth guard
// =============================================================

#[test]
fn auth_guard_allows_token_holders() {
    let store = store_with(Some("T1"));
    assert_eq!(check_auth(&store, "/posts"), GuardOutcome::Allow);
}

#[test]
fn auth_guard_redirects_anonymous_visitors_to_login() {
    let store = store_with(None);
    assert_eq!(
        check_auth(&store, "/posts"),
        GuardOutcome::Redirect(LOGIN_ROUTE)
    );
}

#[test]
fn auth_guard_never_blocks_the_auth_pages() {
    let store = store_with(None);
    assert_eq!(check_auth(&store, "/auth/login"), GuardOutcome::Allow);
    assert_eq!(check_auth(&store, "/auth/register"), GuardOutcome::Allow);
}

// =============================================================
// Admin guard
// =============================================================

#[test]
fn admin_guard_accepts_admin_roles() {
    for role in ["ADMIN", "ROLE_ADMIN"] {
        let store = store_with(Some(&token_with_role(role)));
        assert_eq!(check_admin(&store), GuardOutcome::Allow, "{role}");
    }
}

#[test]
fn admin_guard_sends_regular_users_to_the_feed() {
    let store = store_with(Some(&token_with_role("USER")));
    assert_eq!(check_admin(&store), GuardOutcome::Redirect(POSTS_ROUTE));
}

#[test]
fn admin_guard_sends_anonymous_visitors_to_login() {
    let store = store_with(None);
    assert_eq!(check_admin(&store), GuardOutcome::Redirect(LOGIN_ROUTE));
}

#[test]
fn admin_guard_treats_malformed_tokens_as_non_admin() {
    let store = store_with(Some("not-a-jwt"));
    assert_eq!(check_admin(&store), GuardOutcome::Redirect(POSTS_ROUTE));
}

// =============================================================
// Guest guard
// =============================================================

struct ScriptedTransport {
    script: RefCell<VecDeque<ApiResponse>>,
    calls: Rc<RefCell<u32>>,
}

impl Transport for ScriptedTransport {
    fn send(&self, _req: ApiRequest) -> LocalBoxFuture<'_, ApiResponse> {
        *self.calls.borrow_mut() += 1;
        let resp = self.script.borrow_mut().pop_front().unwrap_or(ApiResponse {
            status: 0,
            body: Value::Null,
        });
        Box::pin(async move { resp })
    }
}

fn guest_client(token: Option<&str>, script: Vec<ApiResponse>) -> (ApiClient, Rc<RefCell<u32>>) {
    let calls = Rc::new(RefCell::new(0));
    let transport = Rc::new(ScriptedTransport {
        script: RefCell::new(script.into()),
        calls: calls.clone(),
    });
    (ApiClient::new(transport, store_with(token)), calls)
}

#[test]
fn guest_guard_allows_anonymous_visitors_without_probing() {
    let (client, calls) = guest_client(None, Vec::new());
    assert_eq!(block_on(check_guest(&client)), GuardOutcome::Allow);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn guest_guard_redirects_confirmed_sessions_home() {
    let me = ApiResponse {
        status: 200,
        body: json!({
            "success": true,
            "message": null,
            "data": { "id": 1, "username": "ann", "email": "a@b.c", "roles": ["USER"] }
        }),
    };
    let (client, _) = guest_client(Some("T1"), vec![me]);
    assert_eq!(
        block_on(check_guest(&client)),
        GuardOutcome::Redirect(HOME_ROUTE)
    );
}

#[test]
fn guest_guard_falls_through_when_the_probe_rejects() {
    // Probe 401, refresh 401: stale token, session is torn down but the
    // login page stays reachable.
    let rejected = ApiResponse {
        status: 401,
        body: json!({ "success": false, "message": null, "data": null }),
    };
    let (client, _) = guest_client(Some("STALE"), vec![rejected.clone(), rejected]);
    assert_eq!(block_on(check_guest(&client)), GuardOutcome::Allow);
    assert_eq!(client.token().get(), None);
}
