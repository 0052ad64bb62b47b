mod common;

use std::sync::Arc;

use futures::executor::block_on;
use parking_lot::Mutex;
use serde_json::json;

use common::app::{current, router};
use navrouter::router::{NavigateOptions, NavigationOutcome, NavigationType, Resolution};
use navrouter::{History, MemoryHistory, RouteEvent, Router, RouterError};

fn app() -> (Router<&'static str>, Arc<MemoryHistory>) {
    let (router, history) = router();
    router.add("/", vec![], "home").unwrap();
    router.add("/users/:id", vec![], "user").unwrap();
    router.add("/users/:id/settings", vec![], "user_settings").unwrap();
    router.add("/search", vec![], "search").unwrap();
    router.add_catch_all("not_found").unwrap();
    (router, history)
}

#[test]
fn test_push_adds_history_entry() {
    let (router, history) = app();
    block_on(router.navigate("/users/1", NavigateOptions::new())).unwrap();
    block_on(router.navigate("/users/2", NavigateOptions::new())).unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history.location().path(), "/users/2");
    assert_eq!(router.param("id").as_deref(), Some("2"));
}

#[test]
fn test_replace_overwrites_current_entry() {
    let (router, history) = app();
    block_on(router.navigate("/users/1", NavigateOptions::new())).unwrap();
    block_on(router.navigate("/users/2", NavigateOptions::replace())).unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history.location().path(), "/users/2");
    assert_eq!(current(&router), Some("user"));
}

#[test]
fn test_internal_navigation_does_not_touch_history() {
    let (router, history) = app();
    let outcome = block_on(router.navigate(
        "/users/9",
        NavigateOptions::new().kind(NavigationType::Internal),
    ))
    .unwrap();

    assert_eq!(outcome, NavigationOutcome::Routed);
    assert_eq!(history.len(), 1);
    assert_eq!(history.location().path(), "/");
    // The route comes from the navigated URL, the query from the visible one.
    assert_eq!(router.param("id").as_deref(), Some("9"));
    assert_eq!(router.current_url().unwrap().path(), "/users/9");
}

#[test]
fn test_back_restores_route_and_meta() {
    let (router, history) = app();
    block_on(router.navigate(
        "/users/1",
        NavigateOptions::new().meta("scroll", json!(240)),
    ))
    .unwrap();
    block_on(router.navigate("/search?q=rust", NavigateOptions::new())).unwrap();
    assert!(router.meta().is_empty());

    let event = history.back().unwrap();
    let resolution = block_on(router.pop_state(event.state)).unwrap();

    assert_eq!(resolution, Resolution::Committed);
    assert_eq!(current(&router), Some("user"));
    assert_eq!(router.param("id").as_deref(), Some("1"));
    assert_eq!(router.meta().get("scroll"), Some(&json!(240)));
    assert_eq!(history.len(), 3);

    let event = history.forward().unwrap();
    block_on(router.pop_state(event.state)).unwrap();
    assert_eq!(current(&router), Some("search"));
    assert_eq!(router.query_param("q").as_deref(), Some("rust"));
}

#[test]
fn test_replace_then_back_restores_previous_entry() {
    let (router, history) = app();
    block_on(router.navigate(
        "/users/1",
        NavigateOptions::new().meta("tab", json!("posts")),
    ))
    .unwrap();
    block_on(router.navigate("/users/2", NavigateOptions::new())).unwrap();
    block_on(router.navigate(
        "/users/3",
        NavigateOptions::replace().meta("tab", json!("likes")),
    ))
    .unwrap();

    let event = history.back().unwrap();
    block_on(router.pop_state(event.state)).unwrap();
    assert_eq!(router.param("id").as_deref(), Some("1"));
    assert_eq!(router.meta().get("tab"), Some(&json!("posts")));
}

#[test]
fn test_replace_initial_entry_then_back_restores_its_meta() {
    let (router, history) = app();
    block_on(router.navigate(
        "/users/1",
        NavigateOptions::replace().meta("tab", json!("posts")),
    ))
    .unwrap();
    block_on(router.navigate("/search", NavigateOptions::new())).unwrap();
    assert_eq!(history.len(), 2);
    assert!(router.meta().is_empty());

    let event = history.back().unwrap();
    block_on(router.pop_state(event.state)).unwrap();

    assert_eq!(current(&router), Some("user"));
    assert_eq!(router.param("id").as_deref(), Some("1"));
    assert_eq!(router.meta().get("tab"), Some(&json!("posts")));
    assert_eq!(router.current_url().unwrap().path(), "/users/1");
}

#[test]
fn test_pop_to_stateless_entry_resolves_current_location() {
    let (router, history) = app();
    block_on(router.navigate("/users/1", NavigateOptions::new())).unwrap();

    let event = history.back().unwrap();
    assert!(event.state.is_none());
    block_on(router.pop_state(event.state)).unwrap();

    assert_eq!(current(&router), Some("home"));
    assert!(router.meta().is_empty());
    assert_eq!(history.len(), 2);
}

#[test]
fn test_query_is_parsed_and_last_duplicate_wins() {
    let (router, _) = app();
    block_on(router.navigate(
        "/search?q=rust&page=2&q=async&empty=",
        NavigateOptions::new(),
    ))
    .unwrap();

    let query = router.query();
    assert_eq!(query.len(), 3);
    assert_eq!(query.get("q").map(String::as_str), Some("async"));
    assert_eq!(query.get("page").map(String::as_str), Some("2"));
    assert_eq!(query.get("empty").map(String::as_str), Some(""));

    block_on(router.navigate("/users/1", NavigateOptions::new())).unwrap();
    assert!(router.query().is_empty());
}

#[test]
fn test_query_values_are_decoded() {
    let (router, _) = app();
    block_on(router.navigate("/search?q=hello%20world&tag=a+b", NavigateOptions::new())).unwrap();
    assert_eq!(router.query_param("q").as_deref(), Some("hello world"));
    assert_eq!(router.query_param("tag").as_deref(), Some("a b"));
}

#[test]
fn test_params_are_substituted_and_encoded() {
    let (router, history) = app();
    block_on(router.navigate(
        "/users/:id/settings",
        NavigateOptions::new().param("id", "ada lovelace"),
    ))
    .unwrap();

    assert_eq!(history.location().path(), "/users/ada%20lovelace/settings");
    assert_eq!(current(&router), Some("user_settings"));
    // Bound params are the raw path segments.
    assert_eq!(router.param("id").as_deref(), Some("ada%20lovelace"));
}

#[test]
fn test_unsubstituted_placeholder_is_navigated_literally() {
    let (router, history) = app();
    block_on(router.navigate(
        "/users/:id",
        NavigateOptions::new().param("other", "1"),
    ))
    .unwrap();
    assert_eq!(history.location().path(), "/users/:id");
    assert_eq!(router.param("id").as_deref(), Some(":id"));
}

#[test]
fn test_relative_destination_resolves_against_current_location() {
    let (router, history) = app();
    block_on(router.navigate("/users/5/", NavigateOptions::new())).unwrap();
    block_on(router.navigate("settings", NavigateOptions::new())).unwrap();

    assert_eq!(history.location().path(), "/users/5/settings");
    assert_eq!(current(&router), Some("user_settings"));

    block_on(router.navigate("../7", NavigateOptions::new())).unwrap();
    assert_eq!(history.location().path(), "/users/7");
    assert_eq!(router.param("id").as_deref(), Some("7"));
}

#[test]
fn test_same_origin_absolute_url_routes_in_page() {
    let (router, history) = app();
    let outcome =
        block_on(router.navigate("http://app.test/users/3", NavigateOptions::new())).unwrap();
    assert_eq!(outcome, NavigationOutcome::Routed);
    assert!(history.assigned().is_empty());
    assert_eq!(router.param("id").as_deref(), Some("3"));
}

#[test]
fn test_cross_origin_leaves_application() {
    let (router, history) = app();
    block_on(router.navigate("/users/1", NavigateOptions::new())).unwrap();
    let before = Arc::new(Mutex::new(0));
    let b = Arc::clone(&before);
    router.on(RouteEvent::BeforeRouteChange, move |_| *b.lock() += 1);

    for destination in [
        "https://app.test/users/2",
        "http://other.test/users/2",
        "//cdn.test/asset.js",
    ] {
        let outcome = block_on(router.navigate(destination, NavigateOptions::new())).unwrap();
        assert!(matches!(outcome, NavigationOutcome::Left(_)), "{destination}");
    }

    let assigned: Vec<_> = history.assigned().iter().map(|u| u.to_string()).collect();
    assert_eq!(
        assigned,
        vec![
            "https://app.test/users/2",
            "http://other.test/users/2",
            "http://cdn.test/asset.js",
        ]
    );
    assert_eq!(*before.lock(), 0);
    assert_eq!(router.param("id").as_deref(), Some("1"));
}

#[test]
fn test_navigation_after_leaving_stays_on_application_origin() {
    let (router, history) = app();
    let outcome =
        block_on(router.navigate("https://evil.test/x", NavigateOptions::new())).unwrap();
    assert!(matches!(outcome, NavigationOutcome::Left(_)));
    assert_eq!(history.location().as_str(), "http://app.test/");

    let outcome = block_on(router.navigate("/inside", NavigateOptions::new())).unwrap();
    assert_eq!(outcome, NavigationOutcome::Routed);
    block_on(router.navigate("next", NavigateOptions::new())).unwrap();

    let committed = router.current_url().unwrap();
    assert_eq!(committed.as_str(), "http://app.test/next");
    assert_eq!(history.location().host_str(), Some("app.test"));
    assert_eq!(history.len(), 3);
    assert_eq!(history.assigned().len(), 1);
}

#[test]
fn test_external_type_leaves_even_for_same_origin() {
    let (router, history) = app();
    let outcome = block_on(router.navigate(
        "/users/4",
        NavigateOptions::new().kind(NavigationType::External),
    ))
    .unwrap();

    let url = match outcome {
        NavigationOutcome::Left(url) => url,
        other => panic!("expected Left, got {other:?}"),
    };
    assert_eq!(url.as_str(), "http://app.test/users/4");
    assert_eq!(history.assigned(), vec![url]);
    assert!(router.current_route().is_none());
}

#[test]
fn test_malformed_destination_is_rejected_without_side_effects() {
    let (router, history) = app();
    let err = block_on(router.navigate("http://[::1", NavigateOptions::new())).unwrap_err();

    assert!(matches!(err, RouterError::MalformedDestination { ref destination, .. } if destination == "http://[::1"));
    assert_eq!(history.len(), 1);
    assert!(history.assigned().is_empty());
    assert!(router.current_route().is_none());
}

#[test]
fn test_failed_resolution_keeps_history_write() {
    let (router, history) = router();
    router.add("/", vec![], "home").unwrap();

    let err = block_on(router.navigate("/missing", NavigateOptions::new())).unwrap_err();
    assert!(matches!(err, RouterError::NoRouteMatches { .. }));
    assert_eq!(history.location().path(), "/missing");
    assert!(router.current_route().is_none());
}

#[test]
fn test_initial_resolve_uses_current_location() {
    let history = Arc::new(MemoryHistory::new(
        "http://app.test/users/11?tab=about".parse().unwrap(),
    ));
    let router: Router<&'static str> = Router::new(Arc::clone(&history));
    router.add("/users/:id", vec![], "user").unwrap();

    assert_eq!(block_on(router.resolve(None)).unwrap(), Resolution::Committed);
    assert_eq!(router.param("id").as_deref(), Some("11"));
    assert_eq!(router.query_param("tab").as_deref(), Some("about"));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_navigate_same_destination_twice_is_stable() {
    let (router, history) = app();
    block_on(router.navigate("/users/8?x=1", NavigateOptions::new())).unwrap();
    let first = router.state();
    block_on(router.navigate("/users/8?x=1", NavigateOptions::new())).unwrap();
    let second = router.state();

    assert_eq!(first.params, second.params);
    assert_eq!(first.query, second.query);
    assert_eq!(first.url, second.url);
    assert_eq!(history.len(), 3);
}

#[test]
fn test_history_limit_drops_oldest_entries() {
    let history = Arc::new(MemoryHistory::with_limit(
        "http://app.test/".parse().unwrap(),
        Some(3),
    ));
    let router: Router<&'static str> = Router::new(Arc::clone(&history));
    router.add("/users/:id", vec![], "user").unwrap();

    for id in 1..=5 {
        block_on(router.navigate(&format!("/users/{id}"), NavigateOptions::new())).unwrap();
    }
    assert_eq!(history.len(), 3);

    let event = history.back().unwrap();
    block_on(router.pop_state(event.state)).unwrap();
    assert_eq!(router.param("id").as_deref(), Some("4"));
    history.back().unwrap();
    assert!(history.back().is_none());
}
