use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use serde_json::json;

use super::*;
use crate::net::http::{ApiRequest, ApiResponse, Transport};
use crate::net::types::ReactionType;
use crate::state::token::{MemoryCache, TokenStore};

struct ScriptedTransport {
    script: RefCell<VecDeque<ApiResponse>>,
    seen: Rc<RefCell<Vec<ApiRequest>>>,
}

impl Transport for ScriptedTransport {
    fn send(&self, req: ApiRequest) -> LocalBoxFuture<'_, ApiResponse> {
        self.seen.borrow_mut().push(req);
        let resp = self.script.borrow_mut().pop_front().unwrap_or(ApiResponse {
            status: 0,
            body: Value::Null,
        });
        Box::pin(async move { resp })
    }
}

fn client_with(script: Vec<ApiResponse>) -> (ApiClient, Rc<RefCell<Vec<ApiRequest>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let transport = Rc::new(ScriptedTransport {
        script: RefCell::new(script.into()),
        seen: seen.clone(),
    });
    let client = ApiClient::new(transport, TokenStore::new(Rc::new(MemoryCache::with_token("T1"))));
    (client, seen)
}

fn ok(data: Value) -> ApiResponse {
    ApiResponse {
        status: 200,
        body: json!({ "success": true, "message": null, "data": data }),
    }
}

fn notification(id: u64, read: bool) -> Value {
    json!({
        "id": id,
        "message": format!("notification {id}"),
        "type": "COMMENT",
        "isRead": read
    })
}

#[test]
fn reaction_helpers_target_the_reacts_endpoints() {
    let summary = json!({ "counts": { "LIKE": 1 }, "userReact": "LIKE" });
    let (client, seen) = client_with(vec![ok(summary.clone()), ok(summary)]);

    let request = ReactRequest {
        react_type: ReactionType::Like,
    };
    block_on(client.react_to_post(9, &request)).unwrap();
    block_on(client.remove_comment_reaction(4)).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen[0].path, "/reacts/posts/9");
    assert_eq!(seen[0].body, Some(json!({ "reactType": "LIKE" })));
    assert_eq!(seen[1].path, "/reacts/comments/4");
}

#[test]
fn notifications_fetch_mirrors_into_the_feed() {
    let (client, _) = client_with(vec![ok(json!({
        "content": [notification(2, false), notification(1, true)],
        "number": 0,
        "size": 10,
        "totalPages": 1,
        "totalElements": 2
    }))]);

    let page = block_on(client.notifications(0, 10)).unwrap();

    assert_eq!(page.content.len(), 2);
    assert_eq!(client.feed().snapshot().len(), 2);
    assert_eq!(client.feed().unread_count(), 1);
}

#[test]
fn mark_read_updates_feed_only_after_the_server_confirms() {
    let (client, _) = client_with(vec![
        ok(json!({
            "content": [notification(1, false)],
            "number": 0, "size": 10, "totalPages": 1, "totalElements": 1
        })),
        ApiResponse {
            status: 500,
            body: json!({ "success": false, "message": null, "data": null }),
        },
    ]);
    block_on(client.notifications(0, 10)).unwrap();

    assert!(block_on(client.mark_notification_read(1)).is_err());
    // Server rejected the change; the local feed keeps the unread state.
    assert_eq!(client.feed().unread_count(), 1);
}

#[test]
fn delete_notification_removes_it_from_the_feed() {
    let (client, _) = client_with(vec![
        ok(json!({
            "content": [notification(1, false), notification(2, false)],
            "number": 0, "size": 10, "totalPages": 1, "totalElements": 2
        })),
        ok(Value::Null),
    ]);
    block_on(client.notifications(0, 10)).unwrap();

    block_on(client.delete_notification(1)).unwrap();

    let items = client.feed().snapshot();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 2);
}

#[test]
fn update_profile_refreshes_the_session_snapshot() {
    let (client, seen) = client_with(vec![ok(json!({
        "id": 1,
        "username": "renamed",
        "email": "a@b.c",
        "roles": ["USER"]
    }))]);

    let update = UpdateProfile {
        username: Some("renamed".to_owned()),
        bio: None,
    };
    block_on(client.update_profile(&update)).unwrap();

    assert_eq!(seen.borrow()[0].path, "/users/current");
    assert_eq!(client.session().user().unwrap().username, "renamed");
}

#[test]
fn moderation_helpers_tolerate_payload_bearing_responses() {
    // Ban endpoints return the updated user; the helper discards it.
    let (client, seen) = client_with(vec![ok(json!({ "id": 7, "banned": true }))]);

    let request = BanRequest {
        reason: "spam".to_owned(),
    };
    block_on(client.ban_user(7, &request)).unwrap();

    assert_eq!(seen.borrow()[0].path, "/admin/users/7/ban");
}
