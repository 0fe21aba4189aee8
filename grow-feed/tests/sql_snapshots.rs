//! Snapshots of the SQL planned for each listing shape.

use grow_feed::{
    AppliedFilter, BoundaryCursor, Cursor, Entity, GrowSortField, Grows, OwnerScope, PageRequest,
    PhotoSortField, Photos, PlantSortField, Plants, Postgres, SortDir, SortSpec, Sqlite, Value,
    find_filter, plan,
};
use insta::assert_snapshot;

#[test]
fn grows_explore_first_page_postgres() {
    let request = PageRequest {
        limit: 12,
        cursor: None,
        sort: SortSpec::new(GrowSortField::CreatedAt, SortDir::Desc),
        filters: vec![
            AppliedFilter {
                spec: *find_filter(Grows::FILTERS, "environment").unwrap(),
                value: Value::from("indoor"),
            },
            AppliedFilter {
                spec: *find_filter(Grows::FILTERS, "search").unwrap(),
                value: Value::from("kush"),
            },
        ],
    };
    let spec = plan::<Grows, _>(Postgres, &request, &OwnerScope::Public).unwrap();
    assert_snapshot!(spec.rows.sql, @"SELECT id, owner_id, name, environment, culture_medium, fertilizer_type, fertilizer_form, created_at, updated_at FROM grow WHERE environment = $1 AND name ILIKE $2 ORDER BY created_at DESC, id DESC LIMIT 13");
    assert_eq!(
        spec.rows.params,
        vec![Value::from("indoor"), Value::from("%kush%")]
    );
}

#[test]
fn own_plants_after_cursor_sqlite() {
    let sort = SortSpec::new(PlantSortField::Name, SortDir::Asc);
    let request = PageRequest {
        limit: 12,
        cursor: Some(Cursor::Boundary(BoundaryCursor::new(
            sort,
            Value::from("Blue Dream"),
            "p7",
        ))),
        sort,
        filters: Vec::new(),
    };
    let spec = plan::<Plants, _>(Sqlite, &request, &OwnerScope::owner("u1")).unwrap();
    assert_snapshot!(spec.rows.sql, @"SELECT id, owner_id, name, grow_id, created_at, updated_at FROM plant WHERE owner_id = ?1 AND (name > ?2 OR (name = ?3 AND id > ?4)) ORDER BY name ASC, id ASC LIMIT 13");
}

#[test]
fn own_photos_page_mode_postgres() {
    let request = PageRequest {
        limit: 4,
        cursor: Some(Cursor::Page(3)),
        sort: SortSpec::new(PhotoSortField::UploadDate, SortDir::Desc),
        filters: Vec::new(),
    };
    let spec = plan::<Photos, _>(Postgres, &request, &OwnerScope::owner("u1")).unwrap();
    assert_snapshot!(spec.rows.sql, @"SELECT id, owner_id, image_url, original_filename, capture_date, created_at, updated_at FROM image WHERE owner_id = $1 ORDER BY created_at DESC, id DESC LIMIT 5 OFFSET 8");
    assert_snapshot!(spec.count.unwrap().sql, @"SELECT COUNT(*) AS count FROM image WHERE owner_id = $1");
}

#[test]
fn photos_by_capture_date_after_null_boundary() {
    let sort = SortSpec::new(PhotoSortField::CaptureDate, SortDir::Desc);
    let request = PageRequest {
        limit: 4,
        cursor: Some(Cursor::Boundary(BoundaryCursor::new(sort, Value::Null, "i9"))),
        sort,
        filters: Vec::new(),
    };
    let spec = plan::<Photos, _>(Postgres, &request, &OwnerScope::owner("u1")).unwrap();
    assert_snapshot!(spec.rows.sql, @"SELECT id, owner_id, image_url, original_filename, capture_date, created_at, updated_at FROM image WHERE owner_id = $1 AND (capture_date IS NULL AND id < $2) ORDER BY capture_date DESC NULLS LAST, id DESC LIMIT 5");
}
