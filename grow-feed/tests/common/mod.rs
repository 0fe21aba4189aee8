//! Shared fixtures for the SQLite-backed integration tests.

#![allow(dead_code)]

use grow_feed::{
    Cursor, Defaults, Entity, EntityPage, FeedError, OwnerScope, Photo, PhotoSortField, Photos,
    Plant, PlantSortField, Plants, RawCursor, RawParams, SortDir, SortSpec, SqliteStore,
    fetch_page,
};

pub const OWNER: &str = "u1";

pub fn store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create_schema().unwrap();
    store
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

pub fn plant(id: &str, name: &str, created: u32) -> Plant {
    Plant {
        id: id.to_string(),
        owner_id: OWNER.to_string(),
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

pub fn plant_defaults() -> Defaults<PlantSortField> {
    Defaults {
        limit: 12,
        sort: SortSpec::new(PlantSortField::Name, SortDir::Asc),
        max_page_size: 100,
        filters: Plants::FILTERS,
    }
}

pub fn photo_defaults() -> Defaults<PhotoSortField> {
    Defaults {
        limit: 4,
        sort: SortSpec::new(PhotoSortField::UploadDate, SortDir::Desc),
        max_page_size: 100,
        filters: Photos::FILTERS,
    }
}

/// Wire form of a next cursor, as a client would send it back.
pub fn raw_cursor<K: grow_feed::SortKey>(cursor: &Cursor<K>) -> RawCursor {
    match cursor {
        Cursor::Page(page) => RawCursor::Page(i64::from(*page)),
        Cursor::Boundary(boundary) => RawCursor::Token(boundary.encode()),
    }
}

/// Follow `nextCursor` from the first page to the last, returning every page.
pub fn walk<E: Entity>(
    store: &SqliteStore,
    mut raw: RawParams,
    defaults: &Defaults<E::SortKey>,
    scope: &OwnerScope,
) -> Result<Vec<EntityPage<E>>, FeedError> {
    let mut pages = Vec::new();
    loop {
        let page = fetch_page::<E, _>(store, &raw, defaults, scope)?;
        let next = page.next_cursor.as_ref().map(raw_cursor);
        pages.push(page);
        match next {
            Some(cursor) => raw.cursor = Some(cursor),
            None => return Ok(pages),
        }
        assert!(pages.len() < 1_000, "pagination did not terminate");
    }
}
