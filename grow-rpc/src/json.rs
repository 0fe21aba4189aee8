//! JSON output for records and pages, built on miniserde.
//!
//! Objects are `BTreeMap`-backed, so serialized keys are always sorted and
//! the same page serializes to the same bytes.

use grow_feed::{Cursor, Grow, Page, Photo, Plant, SortKey};
use miniserde::json::{Array, Number, Object, Value};

/// Conversion to a JSON value.
pub trait ToJson {
    /// Convert this value to JSON.
    fn to_json(&self) -> Value;
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToJson for &str {
    fn to_json(&self) -> Value {
        Value::String((*self).to_string())
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToJson for u32 {
    fn to_json(&self) -> Value {
        Value::Number(Number::U64(u64::from(*self)))
    }
}

impl ToJson for u64 {
    fn to_json(&self) -> Value {
        Value::Number(Number::U64(*self))
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToJson::to_json)
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> Value {
        let mut array = Array::new();
        array.extend(self.iter().map(ToJson::to_json));
        Value::Array(array)
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

/// Build an object from key/value pairs.
pub fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    let mut object = Object::new();
    for (key, value) in fields {
        object.insert(key.to_string(), value);
    }
    Value::Object(object)
}

// === Records ===

impl ToJson for Grow {
    fn to_json(&self) -> Value {
        object([
            ("id", self.id.to_json()),
            ("ownerId", self.owner_id.to_json()),
            ("name", self.name.to_json()),
            ("environment", self.environment.to_json()),
            ("cultureMedium", self.culture_medium.to_json()),
            ("fertilizerType", self.fertilizer_type.to_json()),
            ("fertilizerForm", self.fertilizer_form.to_json()),
            ("createdAt", self.created_at.to_json()),
            ("updatedAt", self.updated_at.to_json()),
        ])
    }
}

impl ToJson for Plant {
    fn to_json(&self) -> Value {
        object([
            ("id", self.id.to_json()),
            ("ownerId", self.owner_id.to_json()),
            ("name", self.name.to_json()),
            ("growId", self.grow_id.to_json()),
            ("createdAt", self.created_at.to_json()),
            ("updatedAt", self.updated_at.to_json()),
        ])
    }
}

impl ToJson for Photo {
    fn to_json(&self) -> Value {
        object([
            ("id", self.id.to_json()),
            ("ownerId", self.owner_id.to_json()),
            ("imageUrl", self.image_url.to_json()),
            ("originalFilename", self.original_filename.to_json()),
            ("captureDate", self.capture_date.to_json()),
            ("createdAt", self.created_at.to_json()),
            ("updatedAt", self.updated_at.to_json()),
        ])
    }
}

// === Pages ===

/// `nextCursor`: the page number in page mode, the token in cursor mode.
impl<K: SortKey> ToJson for Cursor<K> {
    fn to_json(&self) -> Value {
        match self {
            Self::Page(page) => page.to_json(),
            Self::Boundary(boundary) => Value::String(boundary.encode()),
        }
    }
}

/// Serialize a page as
/// `{items, nextCursor?, hasNextPage, totalPages?, totalCount?, cursorReset?}`.
///
/// Absent optional fields are omitted rather than `null`. `cursorReset`
/// appears only when the caller's cursor was discarded.
pub fn page_to_json<T: ToJson, K: SortKey>(page: &Page<T, K>, cursor_reset: bool) -> Value {
    let mut body = Object::new();
    body.insert("items".to_string(), page.items.to_json());
    body.insert("hasNextPage".to_string(), page.has_next_page.to_json());
    if let Some(cursor) = &page.next_cursor {
        body.insert("nextCursor".to_string(), cursor.to_json());
    }
    if let Some(pages) = page.total_pages {
        body.insert("totalPages".to_string(), pages.to_json());
    }
    if let Some(count) = page.total_count {
        body.insert("totalCount".to_string(), count.to_json());
    }
    if cursor_reset {
        body.insert("cursorReset".to_string(), true.to_json());
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grow_feed::{BoundaryCursor, PlantSortField, SortDir, SortSpec};

    fn plant(id: &str, name: &str) -> Plant {
        Plant {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            name: name.to_string(),
            grow_id: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_record_fields_are_camel_case() {
        let json = miniserde::json::to_string(&plant("p1", "Blue Dream").to_json());
        assert_eq!(
            json,
            r#"{"createdAt":"2024-01-01T00:00:00.000Z","growId":null,"id":"p1","name":"Blue Dream","ownerId":"u1","updatedAt":"2024-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_page_mode_output() {
        let page: Page<Plant, PlantSortField> = Page {
            items: vec![plant("p1", "A")],
            next_cursor: Some(Cursor::Page(3)),
            has_next_page: true,
            total_pages: Some(5),
            total_count: Some(41),
        };
        let json = miniserde::json::to_string(&page_to_json(&page, false));
        assert!(json.contains(r#""nextCursor":3"#));
        assert!(json.contains(r#""totalPages":5"#));
        assert!(json.contains(r#""totalCount":41"#));
        assert!(json.contains(r#""hasNextPage":true"#));
        assert!(!json.contains("cursorReset"));
    }

    #[test]
    fn test_cursor_mode_output_omits_totals() {
        let sort = SortSpec::new(PlantSortField::Name, SortDir::Asc);
        let boundary = BoundaryCursor::new(sort, "A".into(), "p1");
        let token = boundary.encode();
        let page: Page<Plant, PlantSortField> = Page {
            items: vec![plant("p1", "A")],
            next_cursor: Some(Cursor::Boundary(boundary)),
            has_next_page: true,
            total_pages: None,
            total_count: None,
        };
        let json = miniserde::json::to_string(&page_to_json(&page, true));
        assert!(json.contains(&format!(r#""nextCursor":"{token}""#)));
        assert!(json.contains(r#""cursorReset":true"#));
        assert!(!json.contains("totalPages"));
    }

    #[test]
    fn test_last_page_has_no_next_cursor() {
        let page: Page<Plant, PlantSortField> = Page {
            items: Vec::new(),
            next_cursor: None,
            has_next_page: false,
            total_pages: None,
            total_count: None,
        };
        let json = miniserde::json::to_string(&page_to_json(&page, false));
        assert_eq!(json, r#"{"hasNextPage":false,"items":[]}"#);
    }
}
