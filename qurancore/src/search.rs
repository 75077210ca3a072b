//! Fuzzy surah search
//!
//! Matching and scoring come from `frizbee`. A query of `n` characters may
//! leave at most `floor(0.3 * n)` of them unmatched. Exact field matches rank
//! first, then hits by frizbee score, then by how much of the field the query
//! covers, then by catalog order.

use crate::catalog::SurahSummary;
use frizbee::{match_list, Config};

/// Share of the query's characters that may go unmatched.
pub const MATCH_THRESHOLD: f64 = 0.3;

/// Fields searched per surah: name, Arabic name, translation, revelation place.
const FIELDS: usize = 4;

/// A scored search result.
#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
    pub surah: &'a SurahSummary,
    /// frizbee score of the best field, higher is better.
    pub score: u16,
    /// The query equals the best field, ignoring case.
    pub exact: bool,
    /// Query length over matched field length (1.0 = whole field).
    pub coverage: f64,
}

/// Search index over the surah catalog. Built once; the catalog never changes.
pub struct SearchIndex<'a> {
    surahs: Vec<&'a SurahSummary>,
    /// `FIELDS` lowercased haystacks per surah, in catalog order.
    haystacks: Vec<String>,
}

/// Typos allowed for a query of `len` characters.
pub fn max_typos(len: usize) -> u16 {
    let allowed = (MATCH_THRESHOLD * len as f64).floor() as usize;
    u16::try_from(allowed).unwrap_or(u16::MAX)
}

fn config_for_query(query: &str) -> Config {
    let mut config = Config {
        prefilter: true,
        ..Config::default()
    };
    config.max_typos = Some(max_typos(query.chars().count()));
    config.sort = false;
    config
}

impl<'a> SearchIndex<'a> {
    pub fn new(catalog: &'a [SurahSummary]) -> Self {
        let surahs: Vec<&'a SurahSummary> = catalog.iter().collect();
        let haystacks = surahs
            .iter()
            .flat_map(|s| {
                [
                    s.name.to_lowercase(),
                    s.name_arabic.to_lowercase(),
                    s.name_translation.to_lowercase(),
                    s.revelation_place.as_str().to_lowercase(),
                ]
            })
            .collect();
        Self { surahs, haystacks }
    }

    /// Matching surahs, best first. An empty query returns the catalog as is.
    pub fn search(&self, query: &str) -> Vec<&'a SurahSummary> {
        self.search_scored(query).into_iter().map(|hit| hit.surah).collect()
    }

    pub fn search_scored(&self, query: &str) -> Vec<SearchHit<'a>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self
                .surahs
                .iter()
                .map(|&surah| SearchHit { surah, score: 0, exact: false, coverage: 1.0 })
                .collect();
        }

        let query_len = needle.chars().count();
        let config = config_for_query(&needle);
        let mut best: Vec<Option<SearchHit<'a>>> = vec![None; self.surahs.len()];

        let haystacks: Vec<&str> = self.haystacks.iter().map(String::as_str).collect();
        for m in match_list(&needle, &haystacks, &config) {
            if m.score == 0 {
                continue;
            }
            let field_index = m.index as usize;
            let Some(field) = self.haystacks.get(field_index) else { continue };
            let slot = field_index / FIELDS;
            let Some(&surah) = self.surahs.get(slot) else { continue };
            let field_len = field.chars().count().max(1);
            let hit = SearchHit {
                surah,
                score: m.score,
                exact: *field == needle,
                coverage: (query_len as f64 / field_len as f64).min(1.0),
            };
            match &best[slot] {
                Some(current) if !ranks_before(&hit, current) => {}
                _ => best[slot] = Some(hit),
            }
        }

        let mut hits: Vec<SearchHit<'a>> = best.into_iter().flatten().collect();
        // sort_by is stable, so equal hits keep catalog order
        hits.sort_by(|a, b| {
            b.exact
                .cmp(&a.exact)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| b.coverage.total_cmp(&a.coverage))
        });
        hits
    }
}

fn ranks_before(a: &SearchHit<'_>, b: &SearchHit<'_>) -> bool {
    (a.exact, a.score) > (b.exact, b.score) || ((a.exact, a.score) == (b.exact, b.score) && a.coverage > b.coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, RevelationPlace};

    fn index() -> SearchIndex<'static> {
        SearchIndex::new(catalog())
    }

    #[test]
    fn test_empty_query_returns_catalog_in_order() {
        let idx = index();
        let all = idx.search("");
        assert_eq!(all.len(), 114);
        for (i, s) in all.iter().enumerate() {
            assert_eq!(usize::from(s.id), i + 1);
        }
        assert_eq!(idx.search("   \t").len(), 114);
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let idx = index();
        for surah in catalog() {
            let results = idx.search(surah.name);
            assert_eq!(
                results.first().map(|s| s.id),
                Some(surah.id),
                "query {:?}",
                surah.name
            );
        }
    }

    #[test]
    fn test_exact_arabic_name_ranks_first() {
        let idx = index();
        for id in [1u16, 4, 18, 38, 50, 114] {
            let surah = &catalog()[usize::from(id) - 1];
            assert_eq!(idx.search(surah.name_arabic).first().map(|s| s.id), Some(id));
        }
    }

    #[test]
    fn test_nonsense_query_is_empty() {
        assert!(index().search("xqzjvwkxq").is_empty());
    }

    #[test]
    fn test_case_insensitive_and_unanchored() {
        let idx = index();
        assert_eq!(idx.search("BAQARAH").first().map(|s| s.id), Some(2));
        assert_eq!(idx.search("cow").first().map(|s| s.id), Some(2));
        assert_eq!(idx.search("kahf").first().map(|s| s.id), Some(18));
    }

    #[test]
    fn test_typo_within_threshold() {
        // one wrong letter in ten, three allowed
        let idx = index();
        assert_eq!(idx.search("Al-Baqaroh").first().map(|s| s.id), Some(2));
    }

    #[test]
    fn test_revelation_place_field() {
        let results = index().search("madina");
        let medinan: Vec<_> = catalog()
            .iter()
            .filter(|s| s.revelation_place == RevelationPlace::Madina)
            .map(|s| s.id)
            .collect();
        for id in medinan {
            assert!(results.iter().any(|s| s.id == id), "missing {}", id);
        }
    }

    #[test]
    fn test_hits_sorted_best_first() {
        let hits = index().search_scored("al-fa");
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!((pair[0].exact, pair[0].score) >= (pair[1].exact, pair[1].score));
        }
    }

    #[test]
    fn test_exact_beats_longer_name() {
        let hits = index().search_scored("An-Nas");
        assert_eq!(hits.first().map(|h| h.surah.id), Some(114));
        assert!(hits[0].exact);
        assert_eq!(hits[0].coverage, 1.0);
    }

    #[test]
    fn test_max_typos_follows_threshold() {
        assert_eq!(max_typos(0), 0);
        assert_eq!(max_typos(3), 0);
        assert_eq!(max_typos(4), 1);
        assert_eq!(max_typos(10), 3);
        assert_eq!(max_typos(20), 6);
    }
}
