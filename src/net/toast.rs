//! Success toast derivation for mutating calls.
//!
//! A server-provided message wins; otherwise the method + URL pattern
//! picks a canned message. Reads and auth-bootstrap calls never reach
//! this table.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use crate::net::http::Method;

pub const MSG_DONE: &str = "Action completed successfully.";

/// Derive the toast for a successful mutating call.
pub fn success_message(method: Method, path: &str, server_message: Option<&str>) -> String {
    if let Some(m) = server_message {
        if !m.trim().is_empty() {
            return m.to_owned();
        }
    }

    let path = path.split('?').next().unwrap_or(path);

    // Moderation endpoints carry their action in the path; check them
    // before the broader domain patterns.
    if path.contains("/admin/users") && path.ends_with("/ban") {
        return "User banned successfully.".to_owned();
    }
    if path.contains("/admin/users") && path.ends_with("/unban") {
        return "User unbanned successfully.".to_owned();
    }
    if path.contains("/admin/comments") && path.ends_with("/hide") {
        return "Comment hidden successfully.".to_owned();
    }
    if path.contains("/admin/comments") && path.ends_with("/unhide") {
        return "Comment unhidden successfully.".to_owned();
    }
    if path.contains("/admin/posts") && path.ends_with("/hide") {
        return "Post hidden successfully.".to_owned();
    }
    if path.contains("/admin/posts") && path.ends_with("/unhide") {
        return "Post unhidden successfully.".to_owned();
    }

    if path.contains("/reports") && path.ends_with("/resolve") {
        return "Report resolved successfully.".to_owned();
    }

    match (method, path) {
        (Method::Post, p) if p.contains("/posts") => "Post created successfully.".to_owned(),
        (Method::Put, p) if p.contains("/posts") => "Post updated successfully.".to_owned(),
        (Method::Delete, p) if p.contains("/posts") => "Post deleted successfully.".to_owned(),

        (Method::Post, p) if p.contains("/comments") => "Comment created successfully.".to_owned(),
        (Method::Put, p) if p.contains("/comments") => "Comment updated successfully.".to_owned(),
        (Method::Delete, p) if p.contains("/comments") => {
            "Comment deleted successfully.".to_owned()
        }

        (Method::Post, p) if p.contains("/reacts") => "Reaction saved successfully.".to_owned(),
        (Method::Delete, p) if p.contains("/reacts") => "Reaction removed successfully.".to_owned(),

        (Method::Post, p) if p.contains("/reports") => "Report submitted successfully.".to_owned(),

        (Method::Put, "/users/current") => "Profile updated successfully.".to_owned(),
        (Method::Put, p) if user_by_id(p) => "User updated successfully.".to_owned(),
        (Method::Delete, p) if user_by_id(p) => "User deleted successfully.".to_owned(),

        _ => MSG_DONE.to_owned(),
    }
}

/// Matches `/users/{id}` with a numeric tail and nothing after it.
fn user_by_id(path: &str) -> bool {
    path.strip_prefix("/users/")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
