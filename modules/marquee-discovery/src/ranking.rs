//! Ordering for presentation.

use std::cmp::Ordering;

use marquee_common::EnrichedItem;

/// Rated items first, best rating first with more votes breaking ties;
/// unrated items follow in arrival order. Truncated to `limit`.
pub fn rank(items: Vec<EnrichedItem>, limit: usize) -> Vec<EnrichedItem> {
    let (mut rated, unrated): (Vec<_>, Vec<_>) =
        items.into_iter().partition(EnrichedItem::is_rated);

    // `sort_by` is stable: full ties keep arrival order.
    rated.sort_by(by_rating_then_votes);

    rated.into_iter().chain(unrated).take(limit).collect()
}

/// First `limit` items as they arrived. Topic sections favour coverage and
/// are not reordered by rating.
pub fn arrival_order(items: Vec<EnrichedItem>, limit: usize) -> Vec<EnrichedItem> {
    items.into_iter().take(limit).collect()
}

fn by_rating_then_votes(a: &EnrichedItem, b: &EnrichedItem) -> Ordering {
    let a_rating = a.rating.unwrap_or(f64::NEG_INFINITY);
    let b_rating = b.rating.unwrap_or(f64::NEG_INFINITY);
    b_rating
        .total_cmp(&a_rating)
        .then_with(|| b.votes.cmp(&a.votes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    fn ids(items: &[EnrichedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn rating_desc_then_votes_desc() {
        let items = vec![
            enriched("a", Some(7.5), 100),
            enriched("b", Some(9.0), 50),
            enriched("c", Some(9.0), 200),
        ];

        let ranked = rank(items, 10);
        let pairs: Vec<(Option<f64>, u64)> = ranked.iter().map(|i| (i.rating, i.votes)).collect();
        assert_eq!(pairs, vec![(Some(9.0), 200), (Some(9.0), 50), (Some(7.5), 100)]);
    }

    #[test]
    fn unrated_follow_rated_in_arrival_order() {
        let items = vec![
            enriched("u1", None, 0),
            enriched("r1", Some(6.0), 10),
            enriched("u2", None, 999),
            enriched("r2", Some(8.0), 10),
        ];
        assert_eq!(ids(&rank(items, 10)), vec!["r2", "r1", "u1", "u2"]);
    }

    #[test]
    fn full_ties_keep_arrival_order() {
        let items = vec![
            enriched("first", Some(7.0), 5),
            enriched("second", Some(7.0), 5),
            enriched("third", Some(7.0), 5),
        ];
        assert_eq!(ids(&rank(items, 10)), vec!["first", "second", "third"]);
    }

    #[test]
    fn truncates_after_ordering() {
        let items = vec![
            enriched("low", Some(5.0), 1),
            enriched("none", None, 0),
            enriched("high", Some(9.5), 1),
        ];
        assert_eq!(ids(&rank(items, 1)), vec!["high"]);
        assert!(rank(vec![], 5).is_empty());
    }

    #[test]
    fn arrival_order_ignores_ratings() {
        let items = vec![
            enriched("a", Some(1.0), 0),
            enriched("b", Some(9.0), 0),
            enriched("c", None, 0),
        ];
        assert_eq!(ids(&arrival_order(items, 2)), vec!["a", "b"]);
    }
}
