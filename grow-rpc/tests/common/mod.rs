//! Fixtures for procedure tests over an in-memory SQLite store.

#![allow(dead_code)]

use grow_feed::{Grow, Photo, Plant, SqliteStore};
use grow_rpc::{FeedConfig, RequestContext, Response, Router};
use miniserde::json::{self, Object, Value};

pub const OWNER: &str = "u1";
pub const OTHER: &str = "u2";

pub fn router() -> Router<SqliteStore> {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create_schema().unwrap();
    Router::new(store, FeedConfig::default())
}

/// Fixed-width timestamp `n` seconds after a fixed origin.
pub fn ts(n: u32) -> String {
    format!(
        "2024-01-01T{:02}:{:02}:{:02}.000Z",
        n / 3600,
        (n / 60) % 60,
        n % 60
    )
}

pub fn plant(id: &str, owner: &str, name: &str, created: u32) -> Plant {
    Plant {
        id: id.to_string(),
        owner_id: owner.to_string(),
        name: name.to_string(),
        grow_id: None,
        created_at: ts(created),
        updated_at: ts(created),
    }
}

pub fn photo(id: &str, capture: Option<u32>, created: u32) -> Photo {
    Photo {
        id: id.to_string(),
        owner_id: OWNER.to_string(),
        image_url: format!("https://img.example/{id}.jpg"),
        original_filename: format!("{id}.jpg"),
        capture_date: capture.map(ts),
        created_at: ts(created),
        updated_at: ts(created),
    }
}

pub fn grow(id: &str, name: &str, environment: &str, created: u32) -> Grow {
    Grow {
        id: id.to_string(),
        owner_id: OWNER.to_string(),
        name: name.to_string(),
        environment: Some(environment.to_string()),
        culture_medium: None,
        fertilizer_type: None,
        fertilizer_form: None,
        created_at: ts(created),
        updated_at: ts(created),
    }
}

/// Call as `OWNER` with a fresh context.
pub fn call(router: &Router<SqliteStore>, procedure: &str, body: &str) -> Response {
    router.call(&mut RequestContext::signed_in(OWNER), procedure, body)
}

/// Parse a response body as a JSON object.
pub fn object(response: &Response) -> Object {
    match json::from_str(&response.body) {
        Ok(Value::Object(object)) => object,
        _ => panic!("expected a JSON object, got {}", response.body),
    }
}

/// `id` of each item.
pub fn ids(body: &Object) -> Vec<String> {
    let Some(Value::Array(items)) = body.get("items") else {
        panic!("missing items");
    };
    items
        .iter()
        .map(|item| match item {
            Value::Object(fields) => match fields.get("id") {
                Some(Value::String(id)) => id.clone(),
                _ => panic!("item without a string id: {}", json::to_string(item)),
            },
            _ => panic!("item is not an object: {}", json::to_string(item)),
        })
        .collect()
}

pub fn has_next_page(body: &Object) -> bool {
    matches!(body.get("hasNextPage"), Some(Value::Bool(true)))
}

pub fn number(body: &Object, key: &str) -> Option<u64> {
    match body.get(key)? {
        Value::Number(json::Number::U64(n)) => Some(*n),
        Value::Number(json::Number::I64(n)) => u64::try_from(*n).ok(),
        other => panic!("'{key}' is not an integer: {}", json::to_string(other)),
    }
}

pub fn string<'a>(body: &'a Object, key: &str) -> Option<&'a str> {
    match body.get(key)? {
        Value::String(s) => Some(s),
        other => panic!("'{key}' is not a string: {}", json::to_string(other)),
    }
}

/// `base` (object members without braces) plus the body's `nextCursor`.
pub fn follow(base: &str, body: &Object) -> Option<String> {
    let cursor = json::to_string(body.get("nextCursor")?);
    Some(if base.is_empty() {
        format!(r#"{{"cursor":{cursor}}}"#)
    } else {
        format!(r#"{{{base},"cursor":{cursor}}}"#)
    })
}

/// Ids of every page from the first to the last, one `Vec` per page.
pub fn walk(router: &Router<SqliteStore>, procedure: &str, base: &str) -> Vec<Vec<String>> {
    walk_from(router, procedure, base, format!("{{{base}}}"))
}

/// Like [`walk`], starting from an explicit first request.
pub fn walk_from(
    router: &Router<SqliteStore>,
    procedure: &str,
    base: &str,
    mut request: String,
) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    loop {
        let response = call(router, procedure, &request);
        assert_eq!(response.status, 200, "{}", response.body);
        let body = object(&response);
        pages.push(ids(&body));
        match follow(base, &body) {
            Some(next) => request = next,
            None => return pages,
        }
        assert!(pages.len() < 1_000, "pagination did not terminate");
    }
}
