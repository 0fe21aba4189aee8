//! Procedure calls end to end against an in-memory SQLite store.

mod common;

use common::{
    OTHER, OWNER, call, follow, grow, has_next_page, ids, number, object, photo, plant, router,
    string, walk, walk_from,
};
use grow_rpc::{MIME_PROBLEM_JSON, RequestContext};

// =============================================================================
// Cursor mode
// =============================================================================

#[test]
fn test_cursor_walk_with_duplicate_names() {
    let router = router();
    for (id, name) in [("1", "A"), ("2", "B"), ("3", "B"), ("4", "C"), ("5", "D")] {
        router.store().insert_plant(&plant(id, OWNER, name, 0)).unwrap();
    }

    let base = r#""limit":2,"sortField":"name","sortOrder":"asc""#;
    let first = object(&call(&router, "plants.getOwnPlants", &format!("{{{base}}}")));
    assert_eq!(ids(&first), ["1", "2"]);
    assert!(has_next_page(&first));
    assert!(string(&first, "nextCursor").is_some());
    assert_eq!(number(&first, "totalPages"), None);

    let second = object(&call(&router, "plants.getOwnPlants", &follow(base, &first).unwrap()));
    assert_eq!(ids(&second), ["3", "4"]);
    assert!(has_next_page(&second));

    let third = object(&call(&router, "plants.getOwnPlants", &follow(base, &second).unwrap()));
    assert_eq!(ids(&third), ["5"]);
    assert!(!has_next_page(&third));
    assert!(third.get("nextCursor").is_none());
}

#[test]
fn test_default_sort_for_all_plants_is_newest_first() {
    let router = router();
    for (i, owner) in [OWNER, OTHER, OWNER, OTHER].iter().enumerate() {
        let id = format!("p{i}");
        router.store().insert_plant(&plant(&id, owner, "Same", i as u32)).unwrap();
    }

    let pages = walk(&router, "plants.getAllPlants", r#""limit":3"#);
    assert_eq!(pages, [vec!["p3", "p2", "p1"], vec!["p0"]]);
}

#[test]
fn test_photos_by_capture_date_put_missing_dates_last() {
    let router = router();
    router.store().insert_photo(&photo("i1", None, 1)).unwrap();
    router.store().insert_photo(&photo("i2", Some(50), 2)).unwrap();
    router.store().insert_photo(&photo("i3", Some(10), 3)).unwrap();
    router.store().insert_photo(&photo("i4", None, 4)).unwrap();
    router.store().insert_photo(&photo("i5", Some(30), 5)).unwrap();

    let pages = walk(
        &router,
        "photos.getOwnPhotos",
        r#""limit":2,"sortField":"captureDate","sortOrder":"desc""#,
    );
    assert_eq!(pages, [vec!["i2", "i5"], vec!["i3", "i4"], vec!["i1"]]);
}

// =============================================================================
// Page mode
// =============================================================================

#[test]
fn test_page_numbers_report_totals() {
    let router = router();
    for i in 0..25 {
        router.store().insert_photo(&photo(&format!("i{i:02}"), None, i)).unwrap();
    }

    let first = object(&call(&router, "photos.getOwnPhotos", r#"{"page":1,"limit":10}"#));
    assert_eq!(ids(&first).len(), 10);
    assert_eq!(number(&first, "totalPages"), Some(3));
    assert_eq!(number(&first, "totalCount"), Some(25));
    assert_eq!(number(&first, "nextCursor"), Some(2));
    assert!(has_next_page(&first));

    let third = object(&call(&router, "photos.getOwnPhotos", r#"{"page":3,"limit":10}"#));
    assert_eq!(ids(&third).len(), 5);
    assert!(!has_next_page(&third));
    assert!(third.get("nextCursor").is_none());

    let past_end = object(&call(&router, "photos.getOwnPhotos", r#"{"page":4,"limit":10}"#));
    assert!(ids(&past_end).is_empty());
    assert!(!has_next_page(&past_end));
    assert_eq!(number(&past_end, "totalPages"), Some(3));
}

#[test]
fn test_integer_cursor_walks_pages() {
    let router = router();
    for i in 0..7 {
        router.store().insert_photo(&photo(&format!("i{i}"), None, i)).unwrap();
    }

    let pages = walk_from(
        &router,
        "photos.getOwnPhotos",
        r#""limit":3"#,
        r#"{"cursor":1,"limit":3}"#.to_string(),
    );
    assert_eq!(
        pages,
        [vec!["i6", "i5", "i4"], vec!["i3", "i2", "i1"], vec!["i0"]]
    );
}

#[test]
fn test_empty_listing_in_page_mode() {
    let router = router();
    let body = object(&call(&router, "grows.getOwnGrows", r#"{"page":1}"#));
    assert!(ids(&body).is_empty());
    assert_eq!(number(&body, "totalPages"), Some(0));
    assert_eq!(number(&body, "totalCount"), Some(0));
    assert!(!has_next_page(&body));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_limit_out_of_range() {
    let router = router();
    for body in [r#"{"limit":0}"#, r#"{"limit":10000}"#, r#"{"limit":-1}"#] {
        let response = call(&router, "plants.getOwnPlants", body);
        assert_eq!(response.status, 400, "{body}");
        assert_eq!(response.content_type, MIME_PROBLEM_JSON);
        let problem = object(&response);
        assert_eq!(string(&problem, "field"), Some("limit"));
        assert_eq!(string(&problem, "type"), Some("urn:problem:validation"));
        assert_eq!(number(&problem, "status"), Some(400));
    }
}

#[test]
fn test_unknown_sort_field_lists_allowed_fields() {
    let router = router();
    let response = call(&router, "plants.getOwnPlants", r#"{"sortField":"updatedAt"}"#);
    assert_eq!(response.status, 400);
    let problem = object(&response);
    assert_eq!(string(&problem, "field"), Some("sortField"));
    assert!(string(&problem, "detail").unwrap().contains("name, createdAt"));
}

#[test]
fn test_filters_are_per_procedure() {
    let router = router();
    let rejected = call(&router, "grows.getOwnGrows", r#"{"filters":{"search":"kush"}}"#);
    assert_eq!(rejected.status, 400);
    assert_eq!(string(&object(&rejected), "field"), Some("filters"));

    let accepted = call(&router, "grows.explore", r#"{"filters":{"search":"kush"}}"#);
    assert_eq!(accepted.status, 200);
}

#[test]
fn test_unknown_procedure() {
    let router = router();
    let response = call(&router, "grows.deleteGrow", "");
    assert_eq!(response.status, 404);
    assert_eq!(string(&object(&response), "type"), Some("urn:problem:not-found"));
}

// =============================================================================
// Cursor reset
// =============================================================================

#[test]
fn test_cursor_for_other_sort_field_restarts() {
    let router = router();
    for (id, name) in [("1", "A"), ("2", "B"), ("3", "C")] {
        router.store().insert_plant(&plant(id, OWNER, name, 0)).unwrap();
    }
    let first = object(&call(
        &router,
        "plants.getOwnPlants",
        r#"{"limit":1,"sortField":"name","sortOrder":"asc"}"#,
    ));
    let token = string(&first, "nextCursor").unwrap().to_string();

    let response = call(
        &router,
        "plants.getOwnPlants",
        &format!(r#"{{"limit":1,"sortField":"createdAt","sortOrder":"asc","cursor":"{token}"}}"#),
    );
    assert_eq!(response.status, 200);
    let body = object(&response);
    assert!(matches!(
        body.get("cursorReset"),
        Some(miniserde::json::Value::Bool(true))
    ));
    assert_eq!(ids(&body), ["1"]);
}

#[test]
fn test_tampered_cursor_restarts() {
    let router = router();
    router.store().insert_plant(&plant("1", OWNER, "A", 0)).unwrap();
    let body = object(&call(&router, "plants.getOwnPlants", r#"{"cursor":"eyJrIjoicGxhbnQifQ"}"#));
    assert!(body.contains_key("cursorReset"));
    assert_eq!(ids(&body), ["1"]);
}

// =============================================================================
// Scope and filters
// =============================================================================

#[test]
fn test_own_listings_hide_other_owners() {
    let router = router();
    router.store().insert_plant(&plant("mine", OWNER, "A", 0)).unwrap();
    router.store().insert_plant(&plant("theirs", OTHER, "B", 1)).unwrap();

    let own = object(&call(&router, "plants.getOwnPlants", ""));
    assert_eq!(ids(&own), ["mine"]);

    let all = object(&call(&router, "plants.getAllPlants", ""));
    assert_eq!(ids(&all), ["theirs", "mine"]);

    let anonymous = router.call(&mut RequestContext::anonymous(), "plants.getOwnPlants", "");
    assert_eq!(anonymous.status, 401);
}

#[test]
fn test_filter_not_connected_legacy_key() {
    let router = router();
    router.store().insert_plant(&plant("p1", OWNER, "A", 0)).unwrap();
    for i in 0..3 {
        router.store().insert_photo(&photo(&format!("i{i}"), None, i)).unwrap();
    }
    router.store().link_photo("p1", "i1").unwrap();

    let body = object(&call(&router, "photos.getOwnPhotos", r#"{"filterNotConnected":true}"#));
    assert_eq!(ids(&body), ["i2", "i0"]);

    let body = object(&call(&router, "photos.getOwnPhotos", r#"{"filterNotConnected":false}"#));
    assert_eq!(ids(&body), ["i2", "i1", "i0"]);
}

#[test]
fn test_explore_filters() {
    let router = router();
    router.store().insert_grow(&grow("g1", "Kush Tent", "indoor", 0)).unwrap();
    router.store().insert_grow(&grow("g2", "Backyard", "outdoor", 1)).unwrap();
    router.store().insert_grow(&grow("g3", "kushy corner", "indoor", 2)).unwrap();

    let body = object(&call(
        &router,
        "grows.explore",
        r#"{"filters":{"environment":"indoor","search":"KUSH","cultureMedium":""}}"#,
    ));
    assert_eq!(ids(&body), ["g3", "g1"]);
}

#[test]
fn test_explore_search_by_username() {
    let router = router();
    router.store().insert_user(OWNER, Some("ann")).unwrap();
    router.store().insert_user(OTHER, Some("bob")).unwrap();
    router.store().insert_grow(&grow("g1", "Kush Tent", "indoor", 0)).unwrap();
    let mut theirs = grow("g2", "Kush Corner", "indoor", 1);
    theirs.owner_id = OTHER.to_string();
    router.store().insert_grow(&theirs).unwrap();

    let body = object(&call(&router, "grows.explore", r#"{"filters":{"search":"@bob"}}"#));
    assert_eq!(ids(&body), ["g2"]);

    let body = object(&call(&router, "grows.explore", r#"{"search":"kush @ann "}"#));
    assert_eq!(ids(&body), ["g1"]);

    let body = object(&call(&router, "grows.explore", r#"{"username":"nobody"}"#));
    assert!(ids(&body).is_empty());
}

// =============================================================================
// Failures, idempotence and the request cache
// =============================================================================

#[test]
fn test_store_failure_is_problem_500() {
    let router = router();
    router
        .store()
        .connection()
        .execute("DROP TABLE plant", [])
        .unwrap();

    let response = call(&router, "plants.getOwnPlants", "");
    assert_eq!(response.status, 500);
    assert_eq!(string(&object(&response), "type"), Some("urn:problem:fetch-failed"));
}

#[test]
fn test_same_request_same_bytes() {
    let router = router();
    for (id, name) in [("1", "A"), ("2", "B"), ("3", "B")] {
        router.store().insert_plant(&plant(id, OWNER, name, 0)).unwrap();
    }
    let body = r#"{"limit":2,"sortField":"name"}"#;
    let a = call(&router, "plants.getOwnPlants", body);
    let b = call(&router, "plants.getOwnPlants", body);
    assert_eq!(a.body, b.body);
}

#[test]
fn test_prefetch_then_render_reads_store_once() {
    let router = router();
    router.store().insert_plant(&plant("1", OWNER, "A", 0)).unwrap();
    let mut ctx = RequestContext::signed_in(OWNER);

    let prefetch = router.call(&mut ctx, "plants.getOwnPlants", r#"{"limit":12}"#);
    // Written after the prefetch; the render within the same request must not see it.
    router.store().insert_plant(&plant("2", OWNER, "B", 0)).unwrap();
    let render = router.call(&mut ctx, "plants.getOwnPlants", r#"{ "limit" : 12 }"#);
    assert_eq!(prefetch, render);

    let summary = ctx.finish();
    assert_eq!(summary.calls, 2);
    assert_eq!(summary.cache_hits, 1);

    let next_request = call(&router, "plants.getOwnPlants", r#"{"limit":12}"#);
    assert_eq!(ids(&object(&next_request)), ["1", "2"]);
}
