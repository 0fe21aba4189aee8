//! Named feed procedures.
//!
//! | Procedure             | Scope  | Default sort   | Filters                  |
//! |-----------------------|--------|----------------|--------------------------|
//! | `grows.getOwnGrows`   | owner  | name asc       | none                     |
//! | `grows.getAllGrows`   | public | createdAt desc | none                     |
//! | `grows.explore`       | public | createdAt desc | every grow filter        |
//! | `plants.getOwnPlants` | owner  | name asc       | none                     |
//! | `plants.getAllPlants` | public | createdAt desc | `growId`, `search`       |
//! | `photos.getOwnPhotos` | owner  | createdAt desc | `filterNotConnected`     |
//!
//! Default page sizes come from [`FeedConfig`] per entity kind.

use std::fmt;

use grow_feed::{
    Defaults, Entity, EntityKind, FilterSpec, GrowSortField, Grows, PhotoSortField, Photos,
    PlantSortField, Plants, SortDir, SortSpec,
};

use crate::config::FeedConfig;

/// A named feed procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    /// The caller's grows.
    GetOwnGrows,
    /// Every grow, newest first.
    GetAllGrows,
    /// Grow discovery with filters.
    ExploreGrows,
    /// The caller's plants.
    GetOwnPlants,
    /// Every plant, newest first.
    GetAllPlants,
    /// The caller's photos.
    GetOwnPhotos,
}

/// Entity and default sort of a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Lists grows.
    Grows(SortSpec<GrowSortField>),
    /// Lists plants.
    Plants(SortSpec<PlantSortField>),
    /// Lists photos.
    Photos(SortSpec<PhotoSortField>),
}

impl Procedure {
    /// Every procedure.
    pub const ALL: &'static [Self] = &[
        Self::GetOwnGrows,
        Self::GetAllGrows,
        Self::ExploreGrows,
        Self::GetOwnPlants,
        Self::GetAllPlants,
        Self::GetOwnPhotos,
    ];

    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetOwnGrows => "grows.getOwnGrows",
            Self::GetAllGrows => "grows.getAllGrows",
            Self::ExploreGrows => "grows.explore",
            Self::GetOwnPlants => "plants.getOwnPlants",
            Self::GetAllPlants => "plants.getAllPlants",
            Self::GetOwnPhotos => "photos.getOwnPhotos",
        }
    }

    /// Look up a procedure by wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Whether the procedure lists only the caller's records.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(self, Self::GetOwnGrows | Self::GetOwnPlants | Self::GetOwnPhotos)
    }

    /// Entity and default sort.
    #[must_use]
    pub const fn listing(self) -> Listing {
        match self {
            Self::GetOwnGrows => Listing::Grows(SortSpec::new(GrowSortField::Name, SortDir::Asc)),
            Self::GetAllGrows | Self::ExploreGrows => {
                Listing::Grows(SortSpec::new(GrowSortField::CreatedAt, SortDir::Desc))
            },
            Self::GetOwnPlants => Listing::Plants(SortSpec::new(PlantSortField::Name, SortDir::Asc)),
            Self::GetAllPlants => {
                Listing::Plants(SortSpec::new(PlantSortField::CreatedAt, SortDir::Desc))
            },
            Self::GetOwnPhotos => {
                Listing::Photos(SortSpec::new(PhotoSortField::UploadDate, SortDir::Desc))
            },
        }
    }

    /// Entity kind listed.
    #[must_use]
    pub const fn entity(self) -> EntityKind {
        match self.listing() {
            Listing::Grows(_) => EntityKind::Grow,
            Listing::Plants(_) => EntityKind::Plant,
            Listing::Photos(_) => EntityKind::Photo,
        }
    }

    /// Filters the procedure accepts.
    #[must_use]
    pub const fn filters(self) -> &'static [FilterSpec] {
        match self {
            Self::ExploreGrows => Grows::FILTERS,
            Self::GetAllPlants => Plants::FILTERS,
            Self::GetOwnPhotos => Photos::FILTERS,
            Self::GetOwnGrows | Self::GetAllGrows | Self::GetOwnPlants => &[],
        }
    }

    /// Normalization defaults for this procedure under `config`.
    #[must_use]
    pub const fn defaults<K>(self, sort: SortSpec<K>, config: &FeedConfig) -> Defaults<K> {
        Defaults {
            limit: config.per_page(self.entity()),
            sort,
            max_page_size: config.max_page_size,
            filters: self.filters(),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
