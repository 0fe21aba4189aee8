//! Sort key registry.
//!
//! Each entity kind has a closed enum of sortable fields. The enum maps to a
//! [`ComparatorDescriptor`] through an exhaustive `match`, so adding a
//! variant without describing its column fails to compile.

use std::fmt;

use crate::builder::{Nulls, SortDir, Value};
use crate::error::FeedError;

/// Storage type of a sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Free text, compared bytewise.
    Text,
    /// Fixed-width RFC 3339 UTC string, so text order is chronological.
    Timestamp,
    /// Integer or float.
    Numeric,
}

impl DataType {
    /// Name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Numeric => "numeric",
        }
    }
}

/// How a sort field is stored and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparatorDescriptor {
    /// Storage column.
    pub column: &'static str,
    /// Storage type.
    pub data_type: DataType,
    /// Whether the column may hold `NULL`.
    pub nullable: bool,
    /// Placement of nulls, in both directions.
    pub nulls: Nulls,
}

impl ComparatorDescriptor {
    const fn required(column: &'static str, data_type: DataType) -> Self {
        Self {
            column,
            data_type,
            nullable: false,
            nulls: Nulls::Last,
        }
    }

    const fn optional(column: &'static str, data_type: DataType) -> Self {
        Self {
            column,
            data_type,
            nullable: true,
            nulls: Nulls::Last,
        }
    }

    /// Whether `value` can be a boundary value for this column.
    #[must_use]
    pub const fn accepts(&self, value: &Value) -> bool {
        match (self.data_type, value) {
            (_, Value::Null) => self.nullable,
            (DataType::Text | DataType::Timestamp, Value::String(_)) => true,
            (DataType::Numeric, Value::Int(_) | Value::Float(_)) => true,
            _ => false,
        }
    }

    /// Null placement to spell out in `ORDER BY`, `None` for required columns.
    #[must_use]
    pub const fn order_nulls(&self) -> Option<Nulls> {
        if self.nullable { Some(self.nulls) } else { None }
    }
}

/// Entity kinds that can be paginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A grow (a tent or room with plants).
    Grow,
    /// A plant.
    Plant,
    /// An uploaded photo.
    Photo,
}

impl EntityKind {
    /// Every entity kind.
    pub const ALL: &'static [Self] = &[Self::Grow, Self::Plant, Self::Photo];

    /// Wire name, also embedded in cursor tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grow => "grow",
            Self::Plant => "plant",
            Self::Photo => "photo",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Wire names of the sortable fields of this kind.
    #[must_use]
    pub fn sort_fields(self) -> Vec<&'static str> {
        match self {
            Self::Grow => names::<GrowSortField>(),
            Self::Plant => names::<PlantSortField>(),
            Self::Photo => names::<PhotoSortField>(),
        }
    }

    /// Look up the comparator for a sort field by wire name.
    pub fn resolve(self, field: &str) -> Result<ComparatorDescriptor, FeedError> {
        let descriptor = match self {
            Self::Grow => GrowSortField::parse(field).map(SortKey::descriptor),
            Self::Plant => PlantSortField::parse(field).map(SortKey::descriptor),
            Self::Photo => PhotoSortField::parse(field).map(SortKey::descriptor),
        };
        descriptor.ok_or_else(|| FeedError::InvalidSortField {
            entity: self,
            field: field.to_string(),
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn names<K: SortKey>() -> Vec<&'static str> {
    K::ALL.iter().map(|k| k.name()).collect()
}

/// A closed set of sortable fields for one entity kind.
pub trait SortKey: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Entity kind the fields belong to.
    const ENTITY: EntityKind;

    /// Every field, in declaration order.
    const ALL: &'static [Self];

    /// Wire name (`sortField` value).
    fn name(self) -> &'static str;

    /// Storage and comparison semantics.
    fn descriptor(self) -> ComparatorDescriptor;

    /// Parse a wire name. Case-sensitive.
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec<K> {
    /// Field to sort by.
    pub field: K,
    /// Direction, also applied to the id tie-breaker.
    pub order: SortDir,
}

impl<K> SortSpec<K> {
    /// Create a sort spec.
    pub const fn new(field: K, order: SortDir) -> Self {
        Self { field, order }
    }
}

/// Sortable grow fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowSortField {
    /// Grow name.
    Name,
    /// Creation time.
    CreatedAt,
    /// Last update time.
    UpdatedAt,
}

impl SortKey for GrowSortField {
    const ENTITY: EntityKind = EntityKind::Grow;
    const ALL: &'static [Self] = &[Self::Name, Self::CreatedAt, Self::UpdatedAt];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    fn descriptor(self) -> ComparatorDescriptor {
        match self {
            Self::Name => ComparatorDescriptor::required("name", DataType::Text),
            Self::CreatedAt => ComparatorDescriptor::required("created_at", DataType::Timestamp),
            Self::UpdatedAt => ComparatorDescriptor::required("updated_at", DataType::Timestamp),
        }
    }
}

/// Sortable plant fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlantSortField {
    /// Plant name.
    Name,
    /// Creation time.
    CreatedAt,
}

impl SortKey for PlantSortField {
    const ENTITY: EntityKind = EntityKind::Plant;
    const ALL: &'static [Self] = &[Self::Name, Self::CreatedAt];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
        }
    }

    fn descriptor(self) -> ComparatorDescriptor {
        match self {
            Self::Name => ComparatorDescriptor::required("name", DataType::Text),
            Self::CreatedAt => ComparatorDescriptor::required("created_at", DataType::Timestamp),
        }
    }
}

/// Sortable photo fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoSortField {
    /// Upload time (`createdAt` on the wire).
    UploadDate,
    /// Capture time from image metadata; missing for some photos.
    CaptureDate,
}

impl SortKey for PhotoSortField {
    const ENTITY: EntityKind = EntityKind::Photo;
    const ALL: &'static [Self] = &[Self::UploadDate, Self::CaptureDate];

    fn name(self) -> &'static str {
        match self {
            Self::UploadDate => "createdAt",
            Self::CaptureDate => "captureDate",
        }
    }

    fn descriptor(self) -> ComparatorDescriptor {
        match self {
            Self::UploadDate => ComparatorDescriptor::required("created_at", DataType::Timestamp),
            Self::CaptureDate => {
                ComparatorDescriptor::optional("capture_date", DataType::Timestamp)
            },
        }
    }
}
