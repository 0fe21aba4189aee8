//! Paginated entities: tables, columns, declared filters and record types.

use crate::builder::{FilterExpr, Operator, Relation, Value, and, exists, simple};
use crate::registry::{EntityKind, GrowSortField, PhotoSortField, PlantSortField, SortKey};
use crate::store::{FetchError, Row};

/// How a declared filter turns its value into a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Text equality on the column.
    Equals,
    /// Case-insensitive substring match on the column, after trimming.
    Contains,
    /// When `true`, keep rows with no entry in the link table.
    Unlinked(Relation),
    /// Case-insensitive substring match on the owner's username.
    OwnerNamed(Relation),
    /// Like [`Contains`](Self::Contains), with `@user` terms.
    ///
    /// `@ann` matches the owner's username only. `tent @ann` requires both
    /// the column and the username to match.
    ContainsOrOwner(Relation),
}

/// A filter key accepted by a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Wire key inside `filters`.
    pub key: &'static str,
    /// Column the filter applies to (unused for relation-only kinds).
    pub column: &'static str,
    /// Predicate shape.
    pub kind: FilterKind,
}

impl FilterSpec {
    const fn equals(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::Equals,
        }
    }

    const fn contains(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            kind: FilterKind::Contains,
        }
    }

    /// Type name of the accepted value, for error messages.
    #[must_use]
    pub const fn expected(&self) -> &'static str {
        match self.kind {
            FilterKind::Unlinked(_) => "boolean",
            _ => "string",
        }
    }

    /// Whether `value` has the right type. Null is always accepted.
    #[must_use]
    pub const fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self.kind, value),
            (_, Value::Null)
                | (FilterKind::Unlinked(_), Value::Bool(_))
                | (
                    FilterKind::Equals
                        | FilterKind::Contains
                        | FilterKind::OwnerNamed(_)
                        | FilterKind::ContainsOrOwner(_),
                    Value::String(_)
                )
        )
    }

    /// Values that switch the filter off: null, `false`, `""`, and text
    /// that leaves nothing to match once trimmed.
    #[must_use]
    pub fn is_inactive(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (_, Value::Null | Value::Bool(false)) => true,
            (FilterKind::Equals, Value::String(s)) => s.is_empty(),
            (FilterKind::Contains | FilterKind::OwnerNamed(_), Value::String(s)) => {
                s.trim().is_empty()
            },
            (FilterKind::ContainsOrOwner(_), Value::String(s)) => {
                SearchTerm::parse(s) == SearchTerm::default()
            },
            _ => false,
        }
    }

    /// Predicate for an active, type-checked value.
    #[must_use]
    pub fn to_expr(&self, value: &Value) -> FilterExpr {
        let text = match value {
            Value::String(s) => s.as_str(),
            _ => "",
        };
        match self.kind {
            FilterKind::Equals => simple(self.column, Operator::Eq, value.clone()),
            FilterKind::Contains => substring(self.column, text.trim()),
            FilterKind::Unlinked(relation) => FilterExpr::NotExists(relation),
            FilterKind::OwnerNamed(relation) => owner_named(relation, text.trim()),
            FilterKind::ContainsOrOwner(relation) => {
                let term = SearchTerm::parse(text);
                let mut parts = Vec::with_capacity(2);
                if let Some(name) = term.name {
                    parts.push(substring(self.column, name));
                }
                if let Some(owner) = term.owner {
                    parts.push(owner_named(relation, owner));
                }
                and(parts)
            },
        }
    }
}

/// A search box entry split into its column and `@owner` halves.
#[derive(Debug, Default, PartialEq, Eq)]
struct SearchTerm<'a> {
    name: Option<&'a str>,
    owner: Option<&'a str>,
}

impl<'a> SearchTerm<'a> {
    fn parse(raw: &'a str) -> Self {
        let term = raw.trim();
        let filled = |s: &'a str| Some(s.trim()).filter(|s| !s.is_empty());
        match term.split_once('@') {
            // Text after a second '@' is ignored
            Some((name, rest)) => Self {
                name: filled(name),
                owner: rest.split('@').next().and_then(filled),
            },
            None => Self {
                name: filled(term),
                owner: None,
            },
        }
    }
}

fn substring(column: &'static str, needle: &str) -> FilterExpr {
    simple(column, Operator::ILike, format!("%{needle}%"))
}

fn owner_named(relation: Relation, needle: &str) -> FilterExpr {
    exists(relation, "username", Operator::ILike, format!("%{needle}%"))
}

/// Look up a declared filter by key.
#[must_use]
pub fn find_filter<'a>(filters: &'a [FilterSpec], key: &str) -> Option<&'a FilterSpec> {
    filters.iter().find(|f| f.key == key)
}

/// A record as returned in a page.
pub trait Record<K: SortKey>: Sized {
    /// Unique id, the tie-breaker.
    fn id(&self) -> &str;

    /// Value of a sort field, as stored.
    fn sort_value(&self, key: K) -> Value;

    /// Decode from a store row selected with the entity's columns.
    fn from_row(row: &Row) -> Result<Self, FetchError>;
}

/// A paginated entity kind bound to its table.
pub trait Entity: 'static {
    /// Sortable fields.
    type SortKey: SortKey;
    /// Row type.
    type Record: Record<Self::SortKey>;

    /// Kind tag.
    const KIND: EntityKind;
    /// Backing table.
    const TABLE: &'static str;
    /// Columns selected for each row.
    const COLUMNS: &'static [&'static str];
    /// Every filter the entity understands.
    const FILTERS: &'static [FilterSpec];
    /// Owner column for owner-scoped listings.
    const OWNER_COLUMN: &'static str = "owner_id";
    /// Unique id column.
    const ID_COLUMN: &'static str = "id";
}

// ============================================================================
// Grows
// ============================================================================

/// Accounts, joined on the listed row's `owner_id`.
pub const OWNER_USER: Relation = Relation {
    table: "users",
    column: "id",
    parent_column: "owner_id",
};

/// Grow entity marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grows;

/// A grow row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grow {
    /// Unique id.
    pub id: String,
    /// Owning user.
    pub owner_id: String,
    /// Display name.
    pub name: String,
    /// Indoor, outdoor or greenhouse.
    pub environment: Option<String>,
    /// Soil, coco, hydro and similar.
    pub culture_medium: Option<String>,
    /// Organic or mineral.
    pub fertilizer_type: Option<String>,
    /// Liquid, granular and similar.
    pub fertilizer_form: Option<String>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

impl Entity for Grows {
    type SortKey = GrowSortField;
    type Record = Grow;

    const KIND: EntityKind = EntityKind::Grow;
    const TABLE: &'static str = "grow";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "owner_id",
        "name",
        "environment",
        "culture_medium",
        "fertilizer_type",
        "fertilizer_form",
        "created_at",
        "updated_at",
    ];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::equals("environment", "environment"),
        FilterSpec::equals("cultureMedium", "culture_medium"),
        FilterSpec::equals("fertilizerType", "fertilizer_type"),
        FilterSpec::equals("fertilizerForm", "fertilizer_form"),
        FilterSpec::equals("ownerId", "owner_id"),
        FilterSpec {
            key: "username",
            column: "owner_id",
            kind: FilterKind::OwnerNamed(OWNER_USER),
        },
        FilterSpec {
            key: "search",
            column: "name",
            kind: FilterKind::ContainsOrOwner(OWNER_USER),
        },
    ];
}

impl Record<GrowSortField> for Grow {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_value(&self, key: GrowSortField) -> Value {
        match key {
            GrowSortField::Name => Value::from(self.name.as_str()),
            GrowSortField::CreatedAt => Value::from(self.created_at.as_str()),
            GrowSortField::UpdatedAt => Value::from(self.updated_at.as_str()),
        }
    }

    fn from_row(row: &Row) -> Result<Self, FetchError> {
        Ok(Self {
            id: row.text("id")?,
            owner_id: row.text("owner_id")?,
            name: row.text("name")?,
            environment: row.opt_text("environment")?,
            culture_medium: row.opt_text("culture_medium")?,
            fertilizer_type: row.opt_text("fertilizer_type")?,
            fertilizer_form: row.opt_text("fertilizer_form")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

// ============================================================================
// Plants
// ============================================================================

/// Plant entity marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plants;

/// A plant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plant {
    /// Unique id.
    pub id: String,
    /// Owning user.
    pub owner_id: String,
    /// Display name.
    pub name: String,
    /// Grow the plant is connected to.
    pub grow_id: Option<String>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

impl Entity for Plants {
    type SortKey = PlantSortField;
    type Record = Plant;

    const KIND: EntityKind = EntityKind::Plant;
    const TABLE: &'static str = "plant";
    const COLUMNS: &'static [&'static str] =
        &["id", "owner_id", "name", "grow_id", "created_at", "updated_at"];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec::equals("growId", "grow_id"),
        FilterSpec::contains("search", "name"),
    ];
}

impl Record<PlantSortField> for Plant {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_value(&self, key: PlantSortField) -> Value {
        match key {
            PlantSortField::Name => Value::from(self.name.as_str()),
            PlantSortField::CreatedAt => Value::from(self.created_at.as_str()),
        }
    }

    fn from_row(row: &Row) -> Result<Self, FetchError> {
        Ok(Self {
            id: row.text("id")?,
            owner_id: row.text("owner_id")?,
            name: row.text("name")?,
            grow_id: row.opt_text("grow_id")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

// ============================================================================
// Photos
// ============================================================================

/// Photo entity marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Photos;

/// A photo row. `image_url` is already resolved by the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Unique id.
    pub id: String,
    /// Owning user.
    pub owner_id: String,
    /// Public image URL.
    pub image_url: String,
    /// File name at upload.
    pub original_filename: String,
    /// Capture time from metadata.
    pub capture_date: Option<String>,
    /// Upload time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

/// Link table connecting photos to plants.
pub const PLANT_IMAGES: Relation = Relation {
    table: "plant_images",
    column: "image_id",
    parent_column: "id",
};

impl Entity for Photos {
    type SortKey = PhotoSortField;
    type Record = Photo;

    const KIND: EntityKind = EntityKind::Photo;
    const TABLE: &'static str = "image";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "owner_id",
        "image_url",
        "original_filename",
        "capture_date",
        "created_at",
        "updated_at",
    ];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec {
        key: "filterNotConnected",
        column: "id",
        kind: FilterKind::Unlinked(PLANT_IMAGES),
    }];
}

impl Record<PhotoSortField> for Photo {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_value(&self, key: PhotoSortField) -> Value {
        match key {
            PhotoSortField::UploadDate => Value::from(self.created_at.as_str()),
            PhotoSortField::CaptureDate => Value::from(self.capture_date.clone()),
        }
    }

    fn from_row(row: &Row) -> Result<Self, FetchError> {
        Ok(Self {
            id: row.text("id")?,
            owner_id: row.text("owner_id")?,
            image_url: row.text("image_url")?,
            original_filename: row.text("original_filename")?,
            capture_date: row.opt_text("capture_date")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_valid_sql_identifier;

    fn assert_entity_names<E: Entity>() {
        assert!(is_valid_sql_identifier(E::TABLE));
        for column in E::COLUMNS {
            assert!(is_valid_sql_identifier(column), "{column}");
        }
        for key in E::SortKey::ALL {
            let column = key.descriptor().column;
            assert!(E::COLUMNS.contains(&column), "{column} not selected");
        }
        for filter in E::FILTERS {
            assert!(is_valid_sql_identifier(filter.column));
        }
        assert_eq!(E::SortKey::ENTITY, E::KIND);
    }

    #[test]
    fn test_entities_are_consistent() {
        assert_entity_names::<Grows>();
        assert_entity_names::<Plants>();
        assert_entity_names::<Photos>();
    }

    #[test]
    fn test_filter_activity() {
        let environment = find_filter(Grows::FILTERS, "environment").unwrap();
        assert!(environment.is_inactive(&Value::Null));
        assert!(environment.is_inactive(&Value::from("")));
        assert!(!environment.is_inactive(&Value::from("indoor")));

        let unlinked = find_filter(Photos::FILTERS, "filterNotConnected").unwrap();
        assert!(unlinked.is_inactive(&Value::Bool(false)));
        assert!(!unlinked.is_inactive(&Value::Bool(true)));

        let search = find_filter(Plants::FILTERS, "search").unwrap();
        assert!(search.is_inactive(&Value::from("   ")));
        assert!(!search.is_inactive(&Value::from(" kush ")));

        let explore = find_filter(Grows::FILTERS, "search").unwrap();
        assert!(explore.is_inactive(&Value::from(" @ ")));
        assert!(!explore.is_inactive(&Value::from("@ann")));
        assert!(find_filter(Grows::FILTERS, "username")
            .unwrap()
            .is_inactive(&Value::from("  ")));
    }

    #[test]
    fn test_filter_type_check() {
        let search = find_filter(Plants::FILTERS, "search").unwrap();
        assert!(search.accepts(&Value::from("kush")));
        assert!(!search.accepts(&Value::Bool(true)));
        assert_eq!(search.expected(), "string");

        let unlinked = find_filter(Photos::FILTERS, "filterNotConnected").unwrap();
        assert!(unlinked.accepts(&Value::Bool(true)));
        assert!(!unlinked.accepts(&Value::from("yes")));
        assert!(find_filter(Photos::FILTERS, "search").is_none());
    }

    #[test]
    fn test_filter_exprs() {
        let search = find_filter(Plants::FILTERS, "search").unwrap();
        assert_eq!(
            search.to_expr(&Value::from("  kush ")),
            simple("name", Operator::ILike, "%kush%")
        );
        let unlinked = find_filter(Photos::FILTERS, "filterNotConnected").unwrap();
        assert_eq!(
            unlinked.to_expr(&Value::Bool(true)),
            FilterExpr::NotExists(PLANT_IMAGES)
        );
    }

    #[test]
    fn test_explore_search_terms() {
        let search = find_filter(Grows::FILTERS, "search").unwrap();
        let owner = |needle: &str| exists(OWNER_USER, "username", Operator::ILike, needle);

        assert_eq!(
            search.to_expr(&Value::from(" kush ")),
            simple("name", Operator::ILike, "%kush%")
        );
        assert_eq!(search.to_expr(&Value::from("@ann")), owner("%ann%"));
        assert_eq!(
            search.to_expr(&Value::from("blue tent @ ann @x")),
            and(vec![simple("name", Operator::ILike, "%blue tent%"), owner("%ann%")])
        );
        assert_eq!(
            search.to_expr(&Value::from("tent@")),
            simple("name", Operator::ILike, "%tent%")
        );

        let username = find_filter(Grows::FILTERS, "username").unwrap();
        assert_eq!(username.to_expr(&Value::from(" ann ")), owner("%ann%"));
    }

    #[test]
    fn test_photo_from_row() {
        let row = Row::new()
            .with("id", "i1")
            .with("owner_id", "u1")
            .with("image_url", "https://img.example/i1.jpg")
            .with("original_filename", "IMG_0001.JPG")
            .with("capture_date", Value::Null)
            .with("created_at", "2024-05-01T10:00:00.000Z")
            .with("updated_at", "2024-05-01T10:00:00.000Z");
        let photo = Photo::from_row(&row).unwrap();
        assert_eq!(photo.capture_date, None);
        assert_eq!(photo.sort_value(PhotoSortField::CaptureDate), Value::Null);
        assert_eq!(photo.id(), "i1");
    }
}
