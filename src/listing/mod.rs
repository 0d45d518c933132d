//! Filter → sort → paginate pipeline for list responses.
//!
//! Stages always run in that order on an already-materialized list:
//!   - **Filter**: in-place stable compaction by predicate
//!   - **Sort**: stable sort by a requested field, ties broken by the item id
//!   - **Paginate**: offset/limit slice with a descriptor of the filtered total

mod paginate;

pub use paginate::paginate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::messages::Pagination;

/// Sort direction. Unspecified sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderBy {
    #[default]
    Unspecified,
    Asc,
    Desc,
}

impl From<String> for OrderBy {
    fn from(s: String) -> Self {
        let name = s.to_lowercase();
        match name.strip_prefix("order_by_").unwrap_or(&name) {
            "asc" => OrderBy::Asc,
            "desc" => OrderBy::Desc,
            _ => OrderBy::Unspecified,
        }
    }
}

impl From<OrderBy> for String {
    fn from(order: OrderBy) -> Self {
        match order {
            OrderBy::Unspecified => "unspecified",
            OrderBy::Asc => "asc",
            OrderBy::Desc => "desc",
        }
        .to_string()
    }
}

/// Comparable projection of one field of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Text(&'a str),
    Int(i64),
    Flag(bool),
    Time(DateTime<Utc>),
}

/// An item that can flow through the list pipeline.
pub trait Listable {
    /// Field selector; its `Default` is the identifier field.
    type SortBy: Copy + Default;

    fn sort_key(&self, field: Self::SortBy) -> SortKey<'_>;

    /// Identifier key used to break ties.
    fn id_key(&self) -> SortKey<'_>;
}

/// Keep only the items matching `predicate`, preserving their order.
pub fn filter<T>(items: &mut Vec<T>, predicate: impl FnMut(&T) -> bool) {
    items.retain(predicate);
}

/// Sort by `field` in direction `order`, breaking ties by id.
///
/// The tie-break follows the same direction as the primary field so a
/// descending sort is the exact reverse of the ascending one.
pub fn sort<T: Listable>(items: &mut [T], order: OrderBy, field: T::SortBy) {
    items.sort_by(|a, b| match order {
        OrderBy::Desc => compare(a, b, field).reverse(),
        OrderBy::Asc | OrderBy::Unspecified => compare(a, b, field),
    });
}

fn compare<T: Listable>(a: &T, b: &T, field: T::SortBy) -> Ordering {
    a.sort_key(field)
        .cmp(&b.sort_key(field))
        .then_with(|| a.id_key().cmp(&b.id_key()))
}

/// Query parameters shared by every list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub order_by: OrderBy,
    pub sort_by: F,
    pub offset: i32,
    pub limit: i32,
}

/// Run the full pipeline over `items` and return the page descriptor.
pub fn apply<T: Listable>(
    items: &mut Vec<T>,
    predicate: impl FnMut(&T) -> bool,
    query: ListQuery<T::SortBy>,
) -> Pagination {
    filter(items, predicate);
    sort(items, query.order_by, query.sort_by);
    paginate(items, query.offset, query.limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Agent, AgentSortBy};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn agents(labels: &[&str]) -> Vec<Agent> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| Agent::new(format!("agent-{}", i), *label))
            .collect()
    }

    fn ids(items: &[Agent]) -> Vec<&str> {
        items.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_filter_is_stable() {
        let mut items = agents(&["a", "b", "a", "b", "a"]);
        filter(&mut items, |a| a.label == "a");
        assert_eq!(ids(&items), vec!["agent-0", "agent-2", "agent-4"]);
    }

    #[test]
    fn test_sort_ties_broken_by_id() {
        let mut items = agents(&["b", "a", "b", "a"]);
        items.reverse();
        sort(&mut items, OrderBy::Asc, AgentSortBy::Label);
        assert_eq!(ids(&items), vec!["agent-1", "agent-3", "agent-0", "agent-2"]);

        sort(&mut items, OrderBy::Desc, AgentSortBy::Label);
        assert_eq!(ids(&items), vec!["agent-2", "agent-0", "agent-3", "agent-1"]);
    }

    #[test]
    fn test_unspecified_order_is_ascending() {
        let mut items = agents(&["x", "y", "z"]);
        items.reverse();
        sort(&mut items, OrderBy::Unspecified, AgentSortBy::default());
        assert_eq!(ids(&items), vec!["agent-0", "agent-1", "agent-2"]);
    }

    #[test]
    fn test_order_by_parsing() {
        assert_eq!(OrderBy::from("ORDER_BY_DESC".to_string()), OrderBy::Desc);
        assert_eq!(OrderBy::from("asc".to_string()), OrderBy::Asc);
        assert_eq!(OrderBy::from("sideways".to_string()), OrderBy::Unspecified);
    }

    #[test]
    fn test_apply_runs_stages_in_order() {
        let mut items = agents(&["a", "a", "b", "a", "b"]);
        let page = apply(
            &mut items,
            |a| a.label == "a",
            ListQuery {
                order_by: OrderBy::Asc,
                sort_by: AgentSortBy::Id,
                offset: 1,
                limit: 2,
            },
        );
        assert_eq!(ids(&items), vec!["agent-1", "agent-3"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.returned(), 2);
    }

    fn label_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..40)
            .prop_map(|v| v.into_iter().map(String::from).collect())
    }

    fn order_strategy() -> impl Strategy<Value = OrderBy> {
        prop_oneof![Just(OrderBy::Asc), Just(OrderBy::Desc), Just(OrderBy::Unspecified)]
    }

    proptest! {
        #[test]
        fn prop_page_matches_reference(
            labels in label_strategy(),
            order_by in order_strategy(),
            offset in -5i32..50,
            limit in -2i32..20,
        ) {
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut items = agents(&refs);

            // Every kept item has label "a", so the order reduces to the id order.
            let mut reference: Vec<String> = items
                .iter()
                .filter(|a| a.label == "a")
                .map(|a| a.id.clone())
                .collect();
            reference.sort();
            if order_by == OrderBy::Desc {
                reference.reverse();
            }
            let expected = reference.len() as i32;

            let page = apply(
                &mut items,
                |a| a.label == "a",
                ListQuery { order_by, sort_by: AgentSortBy::Label, offset, limit },
            );

            let start = if offset < 0 { (expected + offset).max(0) } else { offset.min(expected) };
            let remaining = expected - start;
            let n = if limit > 0 { limit.min(remaining) } else { remaining };

            prop_assert_eq!(page.total, expected);
            prop_assert_eq!(items.len() as i32, n);
            if offset >= 0 {
                let bound = (expected - offset).max(0);
                let len = if limit > 0 { limit.min(bound) } else { bound };
                prop_assert_eq!(items.len() as i32, len);
            }
            let want = &reference[start as usize..(start + n) as usize];
            prop_assert_eq!(ids(&items), want.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn prop_sort_is_idempotent(labels in label_strategy(), order_by in order_strategy()) {
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut once = agents(&refs);
            sort(&mut once, order_by, AgentSortBy::Label);
            let mut twice = once.clone();
            sort(&mut twice, order_by, AgentSortBy::Label);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sort_is_deterministic(labels in label_strategy()) {
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut forward = agents(&refs);
            let mut backward = forward.clone();
            backward.reverse();
            sort(&mut forward, OrderBy::Asc, AgentSortBy::Label);
            sort(&mut backward, OrderBy::Asc, AgentSortBy::Label);
            prop_assert_eq!(forward, backward);
        }
    }
}
