use super::*;

// =============================================================
// Endpoint categorization
// =============================================================

#[test]
fn categorize_auth_bootstrap_endpoints() {
    for path in [
        "/auth/login",
        "/auth/register",
        "/auth/refresh",
        "/auth/logout",
    ] {
        assert_eq!(categorize(path), EndpointCategory::AuthBootstrap, "{path}");
    }
}

#[test]
fn categorize_who_am_i_probe() {
    assert_eq!(categorize("/auth/me"), EndpointCategory::WhoAmI);
}

#[test]
fn categorize_avatar_as_optional() {
    assert_eq!(
        categorize("/users/7/avatar"),
        EndpointCategory::OptionalResource
    );
}

#[test]
fn categorize_primary_entities() {
    assert_eq!(categorize("/posts/42"), EndpointCategory::PrimaryEntity);
    assert_eq!(categorize("/comments/9"), EndpointCategory::PrimaryEntity);
    assert_eq!(categorize("/users/3"), EndpointCategory::PrimaryEntity);
}

#[test]
fn categorize_collections_and_nested_paths_as_general() {
    assert_eq!(categorize("/posts"), EndpointCategory::General);
    assert_eq!(categorize("/posts/user/5"), EndpointCategory::General);
    assert_eq!(categorize("/users/current"), EndpointCategory::General);
    assert_eq!(categorize("/notifications/3/read"), EndpointCategory::General);
}

#[test]
fn categorize_ignores_query_string() {
    assert_eq!(categorize("/posts/42?full=true"), EndpointCategory::PrimaryEntity);
    assert_eq!(categorize("/posts?page=0&size=10"), EndpointCategory::General);
}

// =============================================================
// Routing table
// =============================================================

/// Table-driven check over the statuses the pipeline must route. Each
/// row: status, category, has_token, retried, expected (recovery,
/// redirect, message, silent).
#[test]
fn routing_table() {
    use EndpointCategory as C;

    struct Row {
        status: u16,
        category: C,
        has_token: bool,
        retried: bool,
        recovery: Recovery,
        redirect: Option<&'static str>,
        message: &'static str,
        silent: bool,
    }

    let rows = [
        Row {
            status: 400,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_BAD_REQUEST,
            silent: false,
        },
        Row {
            status: 401,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::RefreshAndRetry,
            redirect: None,
            message: MSG_SESSION_EXPIRED,
            silent: true,
        },
        Row {
            status: 401,
            category: C::General,
            has_token: false,
            retried: false,
            recovery: Recovery::TerminalLogout,
            redirect: Some(LOGIN_ROUTE),
            message: MSG_LOG_IN,
            silent: false,
        },
        Row {
            status: 401,
            category: C::General,
            has_token: true,
            retried: true,
            recovery: Recovery::TerminalLogout,
            redirect: Some(LOGIN_ROUTE),
            message: MSG_SESSION_EXPIRED,
            silent: false,
        },
        Row {
            status: 403,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: Some(HOME_ROUTE),
            message: MSG_FORBIDDEN,
            silent: false,
        },
        Row {
            status: 404,
            category: C::OptionalResource,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_NOT_FOUND,
            silent: true,
        },
        Row {
            status: 404,
            category: C::PrimaryEntity,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: Some(NOT_FOUND_ROUTE),
            message: MSG_NOT_FOUND,
            silent: true,
        },
        Row {
            status: 404,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_NOT_FOUND,
            silent: false,
        },
        Row {
            status: 409,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_CONFLICT,
            silent: false,
        },
        Row {
            status: 422,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_VALIDATION,
            silent: false,
        },
        Row {
            status: 500,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_SERVER,
            silent: false,
        },
        Row {
            status: 0,
            category: C::General,
            has_token: true,
            retried: false,
            recovery: Recovery::None,
            redirect: None,
            message: MSG_OFFLINE,
            silent: false,
        },
    ];

    for row in rows {
        let got = classify(row.status, row.category, row.has_token, row.retried, None);
        assert_eq!(got.recovery, row.recovery, "status {}", row.status);
        assert_eq!(got.redirect, row.redirect, "status {}", row.status);
        assert_eq!(got.message, row.message, "status {}", row.status);
        assert_eq!(got.silent, row.silent, "status {}", row.status);
    }
}

#[test]
fn who_am_i_401_refreshes_once_then_terminates() {
    let first = classify(401, EndpointCategory::WhoAmI, false, false, None);
    assert_eq!(first.recovery, Recovery::RefreshAndRetry);

    let second = classify(401, EndpointCategory::WhoAmI, false, true, None);
    assert_eq!(second.recovery, Recovery::TerminalLogout);
    assert_eq!(second.redirect, Some(LOGIN_ROUTE));
}

#[test]
fn who_am_i_403_is_also_refreshable() {
    let got = classify(403, EndpointCategory::WhoAmI, true, false, None);
    assert_eq!(got.recovery, Recovery::RefreshAndRetry);
}

#[test]
fn bootstrap_401_is_never_recovered() {
    let got = classify(401, EndpointCategory::AuthBootstrap, true, false, Some("Bad credentials"));
    assert_eq!(got.recovery, Recovery::None);
    assert_eq!(got.redirect, None);
    assert_eq!(got.message, "Bad credentials");
}

#[test]
fn bootstrap_403_does_not_redirect_home() {
    let got = classify(403, EndpointCategory::AuthBootstrap, false, false, None);
    assert_eq!(got.recovery, Recovery::None);
    assert_eq!(got.redirect, None);
}

#[test]
fn conflict_keeps_server_message_verbatim() {
    let got = classify(409, EndpointCategory::General, true, false, Some("Username already taken"));
    assert_eq!(got.message, "Username already taken");
}

#[test]
fn blank_server_message_falls_back_to_generic() {
    let got = classify(400, EndpointCategory::General, true, false, Some("   "));
    assert_eq!(got.message, MSG_BAD_REQUEST);
}

#[test]
fn unknown_4xx_uses_server_message_or_generic() {
    let got = classify(418, EndpointCategory::General, true, false, Some("teapot"));
    assert_eq!(got.kind, ErrorKind::Unknown);
    assert_eq!(got.message, "teapot");

    let got = classify(418, EndpointCategory::General, true, false, None);
    assert_eq!(got.message, MSG_UNEXPECTED);
}

#[test]
fn all_5xx_map_to_server_error() {
    for status in [500, 502, 503] {
        let got = classify(status, EndpointCategory::General, true, false, None);
        assert_eq!(got.kind, ErrorKind::Server, "status {status}");
        assert_eq!(got.message, MSG_SERVER);
    }
}
