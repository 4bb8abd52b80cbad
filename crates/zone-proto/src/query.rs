//! Query pipeline: search + tag filter + sort, then the featured split.
//!
//! Pure over `&[Zone]`. Results are index lists into the input slice so the
//! caller keeps a single owned copy of the catalog.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::protocol::{SortMode, Zone};

/// Featured strip size.
pub const FEATURED_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Tag(t) => t,
        }
    }

    fn admits(&self, zone: &Zone) -> bool {
        match self {
            Self::All => true,
            Self::Tag(t) => zone.has_tag(t),
        }
    }

    /// Keep the selected tag while it still exists in `tags`, else fall back to `All`.
    pub fn reconcile(self, tags: &[String]) -> Self {
        match self {
            Self::Tag(t) if tags.iter().any(|x| *x == t) => Self::Tag(t),
            _ => Self::All,
        }
    }

    /// Step through `All, tags[0], tags[1], …` forwards or backwards.
    pub fn cycle(&self, tags: &[String], forward: bool) -> Self {
        let slots = tags.len() + 1;
        let pos = match self {
            Self::All => 0,
            Self::Tag(t) => tags.iter().position(|x| x == t).map_or(0, |i| i + 1),
        };
        let next = if forward {
            (pos + 1) % slots
        } else {
            (pos + slots - 1) % slots
        };
        match next {
            0 => Self::All,
            i => Self::Tag(tags[i - 1].clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub tag: TagFilter,
    pub sort: SortMode,
}

/// Indices into the catalog: featured strip first, then the main grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub featured: Vec<usize>,
    pub main: Vec<usize>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.featured.len() + self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.main.is_empty()
    }

    /// Featured then main, the order entries are displayed in.
    pub fn ordered(&self) -> impl Iterator<Item = usize> + '_ {
        self.featured.iter().chain(self.main.iter()).copied()
    }
}

pub fn matches_search(zone: &Zone, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    zone.name.to_lowercase().contains(&needle)
        || zone
            .author
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(&needle))
        || zone.id.to_lowercase().contains(&needle)
}

/// Primary collation key: canonical decomposition with accents dropped, then lowercased.
/// `Émile` collates with `emile`, so it lands among the e's rather than after `z`.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

// Accents and case only break ties, in that order.
fn by_name(a: &Zone, b: &Zone) -> Ordering {
    collation_key(&a.name)
        .cmp(&collation_key(&b.name))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn by_popularity(a: &Zone, b: &Zone) -> Ordering {
    b.popularity.cmp(&a.popularity)
}

fn by_recency(a: &Zone, b: &Zone) -> Ordering {
    match (a.recency_key(), b.recency_key()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_name(a, b),
    }
}

pub fn compare(sort: SortMode, a: &Zone, b: &Zone) -> Ordering {
    match sort {
        SortMode::NameAsc => by_name(a, b),
        SortMode::NameDesc => by_name(b, a),
        SortMode::Popularity => by_popularity(a, b),
        SortMode::Newest => by_recency(a, b),
    }
}

pub fn select(zones: &[Zone], query: &Query) -> Selection {
    let matched: Vec<usize> = zones
        .iter()
        .enumerate()
        .filter(|(_, z)| query.tag.admits(z) && matches_search(z, &query.search))
        .map(|(i, _)| i)
        .collect();

    let mut by_plays = matched.clone();
    by_plays.sort_by(|&a, &b| by_popularity(&zones[a], &zones[b]));
    by_plays.truncate(FEATURED_COUNT);

    let mut main = matched;
    main.sort_by(|&a, &b| compare(query.sort, &zones[a], &zones[b]));
    main.retain(|i| !by_plays.contains(i));

    Selection {
        featured: by_plays,
        main,
    }
}

/// Sorted distinct tags across the whole catalog, ignoring any active filter.
pub fn distinct_tags(zones: &[Zone]) -> Vec<String> {
    zones
        .iter()
        .flat_map(|z| z.tags.iter())
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, name: &str, popularity: u64, tags: &[&str]) -> Zone {
        Zone {
            id: id.to_string(),
            name: name.to_string(),
            popularity,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Zone::default()
        }
    }

    fn pair() -> Vec<Zone> {
        vec![zone("a", "Alpha", 5, &["x"]), zone("b", "Beta", 10, &["y"])]
    }

    fn ids(zones: &[Zone], idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| zones[i].id.clone()).collect()
    }

    fn ordered_ids(zones: &[Zone], sel: &Selection) -> Vec<String> {
        sel.ordered().map(|i| zones[i].id.clone()).collect()
    }

    #[test]
    fn tag_filter_selects_tagged_zone() {
        let zones = pair();
        let q = Query {
            tag: TagFilter::Tag("x".into()),
            ..Query::default()
        };
        assert_eq!(ordered_ids(&zones, &select(&zones, &q)), ["a"]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_author_and_id() {
        let mut zones = pair();
        zones[0].author = Some("Bettany".into());
        let q = Query {
            search: "BET".into(),
            ..Query::default()
        };
        assert_eq!(ordered_ids(&zones, &select(&zones, &q)).len(), 2);

        zones[0].author = None;
        assert_eq!(ordered_ids(&zones, &select(&zones, &q)), ["b"]);

        let by_id = Query {
            search: " a ".into(),
            ..Query::default()
        };
        // "a" is also a substring of "Beta" and "Alpha".
        assert_eq!(select(&zones, &by_id).len(), 2);
    }

    #[test]
    fn sort_modes_order_main_subset() {
        let zones = pair();
        let pop = compare(SortMode::Popularity, &zones[1], &zones[0]);
        assert_eq!(pop, Ordering::Less);

        let mut idx = vec![0, 1];
        idx.sort_by(|&a, &b| compare(SortMode::Popularity, &zones[a], &zones[b]));
        assert_eq!(ids(&zones, &idx), ["b", "a"]);
        idx.sort_by(|&a, &b| compare(SortMode::NameAsc, &zones[a], &zones[b]));
        assert_eq!(ids(&zones, &idx), ["a", "b"]);
        idx.sort_by(|&a, &b| compare(SortMode::NameDesc, &zones[a], &zones[b]));
        assert_eq!(ids(&zones, &idx), ["b", "a"]);
    }

    #[test]
    fn small_sets_are_entirely_featured_by_popularity() {
        let zones = pair();
        let q = Query {
            sort: SortMode::NameAsc,
            ..Query::default()
        };
        let sel = select(&zones, &q);
        assert_eq!(ids(&zones, &sel.featured), ["b", "a"]);
        assert!(sel.main.is_empty());
    }

    #[test]
    fn featured_is_top_five_regardless_of_sort() {
        let zones: Vec<Zone> = (0..9)
            .map(|i| zone(&i.to_string(), &format!("Zone {}", 9 - i), i * 10, &[]))
            .collect();
        for sort in [
            SortMode::NameAsc,
            SortMode::NameDesc,
            SortMode::Popularity,
            SortMode::Newest,
        ] {
            let sel = select(&zones, &Query { sort, ..Query::default() });
            assert_eq!(ids(&zones, &sel.featured), ["8", "7", "6", "5", "4"]);
            assert_eq!(sel.main.len(), 4);
            assert!(sel.main.iter().all(|i| !sel.featured.contains(i)));
        }

        let by_name = select(&zones, &Query::default());
        // Names run "Zone 9".."Zone 1" for ids 0..8.
        assert_eq!(ids(&zones, &by_name.main), ["3", "2", "1", "0"]);
        let newest = select(
            &zones,
            &Query {
                sort: SortMode::Newest,
                ..Query::default()
            },
        );
        assert_eq!(ids(&zones, &newest.main), ["3", "2", "1", "0"]);
    }

    #[test]
    fn newest_prefers_added_and_puts_unkeyed_last() {
        let mut zones = vec![
            zone("10", "Ten", 0, &[]),
            zone("slug", "Slug", 0, &[]),
            zone("2", "Two", 0, &[]),
        ];
        zones[2].added = Some(99);
        let mut idx = vec![0, 1, 2];
        idx.sort_by(|&a, &b| compare(SortMode::Newest, &zones[a], &zones[b]));
        assert_eq!(ids(&zones, &idx), ["2", "10", "slug"]);
    }

    #[test]
    fn featured_ties_keep_catalog_order() {
        let zones = vec![
            zone("p", "P", 3, &[]),
            zone("q", "Q", 3, &[]),
            zone("r", "R", 7, &[]),
        ];
        let sel = select(&zones, &Query::default());
        assert_eq!(ids(&zones, &sel.featured), ["r", "p", "q"]);
    }

    #[test]
    fn accented_names_collate_with_their_base_letter() {
        let emile = zone("1", "Émile", 0, &[]);
        let zeta = zone("2", "Zeta", 0, &[]);
        let eagle = zone("3", "eagle", 0, &[]);
        assert_eq!(compare(SortMode::NameAsc, &emile, &zeta), Ordering::Less);
        assert_eq!(compare(SortMode::NameDesc, &emile, &zeta), Ordering::Greater);
        assert_eq!(compare(SortMode::NameAsc, &eagle, &emile), Ordering::Less);
        assert_eq!(collation_key("Émile"), "emile");

        // Same letters: the unaccented form sorts first.
        let plain = zone("4", "Emile", 0, &[]);
        assert_eq!(compare(SortMode::NameAsc, &plain, &emile), Ordering::Less);
    }

    #[test]
    fn tags_come_from_whole_catalog() {
        let zones = vec![
            zone("1", "One", 0, &["puzzle", "arcade"]),
            zone("2", "Two", 0, &["arcade", ""]),
        ];
        assert_eq!(distinct_tags(&zones), ["arcade", "puzzle"]);
    }

    #[test]
    fn tag_filter_reconcile_and_cycle() {
        let tags = vec!["arcade".to_string(), "puzzle".to_string()];
        assert_eq!(
            TagFilter::Tag("puzzle".into()).reconcile(&tags),
            TagFilter::Tag("puzzle".into())
        );
        assert_eq!(TagFilter::Tag("gone".into()).reconcile(&tags), TagFilter::All);

        let mut f = TagFilter::All;
        f = f.cycle(&tags, true);
        assert_eq!(f, TagFilter::Tag("arcade".into()));
        f = f.cycle(&tags, true).cycle(&tags, true);
        assert_eq!(f, TagFilter::All);
        assert_eq!(f.cycle(&tags, false), TagFilter::Tag("puzzle".into()));
        assert_eq!(TagFilter::All.cycle(&[], true), TagFilter::All);
    }
}
