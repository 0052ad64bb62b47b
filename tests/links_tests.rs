mod common;

use futures::executor::block_on;

use common::app::{current, router};
use navrouter::router::{NavigationOutcome, NavigationType};
use navrouter::{History, LinkClick, LinkDisposition};

#[test]
fn test_plain_link_is_intercepted_and_pushed() {
    let (router, history) = router();
    router.add("/docs/:page", vec![], "docs").unwrap();

    let disposition = block_on(router.follow_link(&LinkClick::new("/docs/intro"))).unwrap();
    assert_eq!(
        disposition,
        LinkDisposition::Intercepted(NavigationOutcome::Routed)
    );
    assert!(disposition.prevents_default());
    assert_eq!(current(&router), Some("docs"));
    assert_eq!(history.len(), 2);
}

#[test]
fn test_replace_link_overwrites_entry() {
    let (router, history) = router();
    router.add("/docs/:page", vec![], "docs").unwrap();

    let click = LinkClick::from_attributes("/docs/faq", Some("replace"));
    assert_eq!(click.kind, Some(NavigationType::Replace));
    block_on(router.follow_link(&click)).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history.location().path(), "/docs/faq");
}

#[test]
fn test_external_link_passes_through() {
    let (router, history) = router();
    router.add_catch_all("any").unwrap();

    let click = LinkClick::new("/docs/intro").kind(NavigationType::External);
    let disposition = block_on(router.follow_link(&click)).unwrap();

    assert_eq!(disposition, LinkDisposition::PassThrough);
    assert!(!disposition.prevents_default());
    assert!(history.assigned().is_empty());
    assert!(router.current_route().is_none());
}

#[test]
fn test_unknown_type_attribute_is_ignored() {
    let click = LinkClick::from_attributes("/a", Some("teleport"));
    assert_eq!(click.kind, None);
    let click = LinkClick::from_attributes("/a", Some("EXTERNAL"));
    assert_eq!(click.kind, Some(NavigationType::External));
}

#[test]
fn test_cross_origin_link_is_intercepted_and_left() {
    let (router, history) = router();
    router.add_catch_all("any").unwrap();

    let disposition =
        block_on(router.follow_link(&LinkClick::new("https://elsewhere.test/page"))).unwrap();
    match disposition {
        LinkDisposition::Intercepted(NavigationOutcome::Left(url)) => {
            assert_eq!(url.as_str(), "https://elsewhere.test/page");
        }
        other => panic!("expected a top-level navigation, got {other:?}"),
    }
    assert_eq!(history.assigned().len(), 1);
}

#[test]
fn test_link_errors_propagate() {
    let (router, _) = router();
    router.add("/only", vec![], "only").unwrap();

    let err = block_on(router.follow_link(&LinkClick::new("/missing"))).unwrap_err();
    assert_eq!(err.to_string(), "No route matches location '/missing'");
}
