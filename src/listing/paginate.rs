//! Offset/limit pagination.

use crate::messages::Pagination;

/// Slice `items` down to one page and describe it.
///
/// A negative `offset` counts back from the end, clamped to the first item.
/// An offset at or past the end yields an empty page. `limit <= 0` means no
/// limit. `total` in the returned descriptor is the length before slicing.
pub fn paginate<T>(items: &mut Vec<T>, offset: i32, limit: i32) -> Pagination {
    let total = i32::try_from(items.len()).unwrap_or(i32::MAX);

    let start = if offset < 0 {
        total.saturating_add(offset).max(0)
    } else {
        offset.min(total)
    };
    let end = if limit <= 0 {
        total
    } else {
        start.saturating_add(limit).min(total)
    };

    items.truncate(end as usize);
    items.drain(..start as usize);

    Pagination {
        offset,
        limit,
        start_index: start,
        end_index: end,
        total,
    }
}
