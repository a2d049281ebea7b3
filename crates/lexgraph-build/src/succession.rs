//! # Article Succession Triples
//!
//! A `NextArticle` edge is identified by `(from, to, amendment_number)`.
//! The same succession is usually recorded twice, once as the newer
//! article's `previous_article` and once as the older article's
//! `next_article`. Every triple goes through a [`SuccessionSet`] so each
//! distinct succession produces exactly one edge; a duplicate would be
//! counted twice by the effectiveness rules.

use std::collections::BTreeSet;

/// One article-to-article succession introduced by an amendment.
///
/// Field order matters: the derived `Ord` sorts by `(from, to,
/// amendment_number)`, the emission order of `NextArticle` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Succession {
    /// Id of the superseded article.
    pub from: i64,
    /// Id of the superseding article.
    pub to: i64,
    /// Sequence number of the amendment that introduced the succession.
    pub amendment_number: i64,
}

impl Succession {
    /// Create a succession triple.
    pub fn new(from: i64, to: i64, amendment_number: i64) -> Self {
        Self {
            from,
            to,
            amendment_number,
        }
    }
}

/// Deduplicated, sorted set of successions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessionSet(BTreeSet<Succession>);

impl SuccessionSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a succession. Returns `false` if it was already present.
    pub fn insert(&mut self, succession: Succession) -> bool {
        self.0.insert(succession)
    }

    /// Record the link implied by an article's `previous_article` field.
    pub fn from_previous(&mut self, article: i64, previous: i64, amendment_number: i64) -> bool {
        self.insert(Succession::new(previous, article, amendment_number))
    }

    /// Record the link implied by an article's `next_article` field.
    pub fn from_next(&mut self, article: i64, next: i64, amendment_number: i64) -> bool {
        self.insert(Succession::new(article, next, amendment_number))
    }

    /// Number of distinct successions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no successions were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Successions ascending by `(from, to, amendment_number)`.
    pub fn iter(&self) -> impl Iterator<Item = &Succession> {
        self.0.iter()
    }
}

impl IntoIterator for SuccessionSet {
    type Item = Succession;
    type IntoIter = std::collections::btree_set::IntoIter<Succession>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions_collapse_to_one() {
        let mut set = SuccessionSet::new();
        assert!(set.from_previous(2, 1, 3));
        assert!(!set.from_next(1, 2, 3));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next(), Some(&Succession::new(1, 2, 3)));
    }

    #[test]
    fn different_amendment_numbers_stay_distinct() {
        let mut set = SuccessionSet::new();
        set.from_next(1, 2, 1);
        set.from_next(1, 2, 2);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut set = SuccessionSet::new();
        set.from_next(5, 6, 1);
        set.from_next(1, 3, 2);
        set.from_next(1, 2, 9);
        let order: Vec<_> = set.into_iter().collect();
        assert_eq!(
            order,
            vec![
                Succession::new(1, 2, 9),
                Succession::new(1, 3, 2),
                Succession::new(5, 6, 1)
            ]
        );
    }
}
