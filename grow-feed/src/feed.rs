//! One-call pagination over a [`FeedStore`].

use crate::entity::{Entity, Record};
use crate::error::FeedError;
use crate::normalize::{Defaults, PageRequest, RawParams, normalize};
use crate::pagination::{Page, assemble};
use crate::plan::{FetchSpec, OwnerScope, plan};
use crate::store::FeedStore;

/// A page of `E` records.
pub type EntityPage<E> = Page<<E as Entity>::Record, <E as Entity>::SortKey>;

/// Fetch one page for a validated request.
///
/// Issues the row query, plus the count query in page mode. Store errors
/// are returned as [`FeedError::Fetch`] without retrying.
pub fn paginate<E, S>(
    store: &S,
    request: &PageRequest<E::SortKey>,
    scope: &OwnerScope,
) -> Result<EntityPage<E>, FeedError>
where
    E: Entity,
    S: FeedStore + ?Sized,
{
    let FetchSpec { rows, count } = plan::<E, _>(store.dialect(), request, scope)?;

    let records = store
        .fetch_rows(&rows)?
        .iter()
        .map(<E::Record as Record<E::SortKey>>::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let total = match count {
        Some(query) => Some(store.count(&query)?),
        None => None,
    };

    Ok(assemble(records, request, total))
}

/// Normalize `raw` against `defaults`, then [`paginate`].
pub fn fetch_page<E, S>(
    store: &S,
    raw: &RawParams,
    defaults: &Defaults<E::SortKey>,
    scope: &OwnerScope,
) -> Result<EntityPage<E>, FeedError>
where
    E: Entity,
    S: FeedStore + ?Sized,
{
    let request = normalize(raw, defaults)?;
    paginate::<E, S>(store, &request, scope)
}
