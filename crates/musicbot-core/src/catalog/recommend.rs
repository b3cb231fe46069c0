//! Related-artist recommendations, least popular first.

use std::sync::Arc;

use tracing::{debug, info};

use super::Catalog;
use crate::dialogue::lists::{and_list, or_list};
use crate::dialogue::phrases::{PhraseBank, IF_YOU_LIKE, YOU_MIGHT_LIKE};
use crate::error::Result;

/// A related artist collected for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub popularity: u8,
}

pub struct Recommender {
    catalog: Arc<dyn Catalog>,
    /// Related artists taken per resolved input artist.
    related_limit: usize,
    /// Lines in the final reply.
    max_results: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn Catalog>, related_limit: usize, max_results: usize) -> Self {
        Self {
            catalog,
            related_limit,
            max_results,
        }
    }

    /// Resolve every name and pool up to `related_limit` related artists
    /// per resolved name. No deduplication across names.
    pub async fn collect_candidates(&self, names: &[String]) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();
        for name in names {
            let Some(artist) = self.catalog.find_artist(name).await? else {
                info!(artist = %name, "Artist not found in catalog");
                continue;
            };
            let related = self.catalog.related_artists(&artist.id).await?;
            debug!(
                artist = %artist.name,
                related = related.len(),
                "Resolved artist"
            );
            candidates.extend(related.into_iter().take(self.related_limit).map(|a| Candidate {
                name: a.name,
                popularity: a.popularity,
            }));
        }
        Ok(candidates)
    }

    /// Build the recommendation reply for the given artist names.
    pub async fn recommend(&self, names: &[String], phrases: &mut PhraseBank) -> Result<String> {
        let candidates = self.collect_candidates(names).await?;

        if candidates.is_empty() {
            return Ok(match names {
                [only] => format!(
                    "I don't know the artist {} 🙁 It's probably too underground..",
                    only
                ),
                _ => format!(
                    "I don't know {}. You must have a really unique taste in music.",
                    or_list(names)
                ),
            });
        }

        let ranked = rank(candidates, self.max_results);
        let mut reply = format!(
            "{}{}{}",
            phrases.pick(IF_YOU_LIKE),
            and_list(names),
            phrases.pick(YOU_MIGHT_LIKE)
        );
        for candidate in &ranked {
            reply.push_str(" - ");
            reply.push_str(&candidate.name);
            reply.push('\n');
        }
        info!(inputs = names.len(), recommended = ranked.len(), "Built recommendation");
        Ok(reply)
    }
}

/// Sort ascending by popularity (stable, so catalog order breaks ties) and
/// keep at most `limit` entries.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.popularity);
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn listed(reply: &str) -> Vec<&str> {
        reply
            .lines()
            .filter_map(|l| l.strip_prefix(" - "))
            .collect()
    }

    #[tokio::test]
    async fn test_orders_by_ascending_popularity() {
        let catalog = FakeCatalog::new().with_artist("Queen", &[("A", 80), ("B", 20), ("C", 50)]);
        let rec = Recommender::new(Arc::new(catalog), 10, 10);
        let mut phrases = PhraseBank::seeded(5);

        let reply = rec.recommend(&names(&["Queen"]), &mut phrases).await.unwrap();
        assert_eq!(listed(&reply), vec!["B", "C", "A"]);
        assert!(reply.ends_with(" - A\n"));
    }

    #[tokio::test]
    async fn test_header_uses_and_list_and_pools() {
        let catalog = FakeCatalog::new()
            .with_artist("Queen", &[("A", 10)])
            .with_artist("Muse", &[("B", 5)]);
        let rec = Recommender::new(Arc::new(catalog), 10, 10);
        let mut phrases = PhraseBank::seeded(9);

        let reply = rec.recommend(&names(&["Queen", "Muse"]), &mut phrases).await.unwrap();
        let header = reply.lines().next().unwrap();
        assert!(IF_YOU_LIKE.iter().any(|p| header.starts_with(p)));
        assert!(header.contains("Queen and Muse"));
        assert!(YOU_MIGHT_LIKE.iter().any(|p| header.ends_with(p.trim_end_matches('\n'))));
        assert_eq!(listed(&reply), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_single_unknown_artist_is_underground() {
        let rec = Recommender::new(Arc::new(FakeCatalog::new()), 10, 10);
        let mut phrases = PhraseBank::seeded(1);

        let reply = rec.recommend(&names(&["Obscura"]), &mut phrases).await.unwrap();
        assert_eq!(
            reply,
            "I don't know the artist Obscura 🙁 It's probably too underground.."
        );
    }

    #[tokio::test]
    async fn test_several_unknown_artists_is_unique_taste() {
        let rec = Recommender::new(Arc::new(FakeCatalog::new()), 10, 10);
        let mut phrases = PhraseBank::seeded(1);

        let reply = rec
            .recommend(&names(&["X", "Y", "Z"]), &mut phrases)
            .await
            .unwrap();
        assert_eq!(
            reply,
            "I don't know X, Y, or Z. You must have a really unique taste in music."
        );
    }

    #[tokio::test]
    async fn test_resolved_artist_without_related_counts_as_unknown() {
        let catalog = FakeCatalog::new().with_artist("Loner", &[]);
        let rec = Recommender::new(Arc::new(catalog), 10, 10);
        let mut phrases = PhraseBank::seeded(1);

        let reply = rec.recommend(&names(&["Loner"]), &mut phrases).await.unwrap();
        assert!(reply.contains("too underground"));
    }

    #[tokio::test]
    async fn test_fewer_than_limit_candidates() {
        let catalog = FakeCatalog::new().with_artist("Queen", &[("A", 3)]);
        let rec = Recommender::new(Arc::new(catalog), 10, 10);
        let mut phrases = PhraseBank::seeded(2);

        let reply = rec.recommend(&names(&["Queen"]), &mut phrases).await.unwrap();
        assert_eq!(listed(&reply), vec!["A"]);
    }

    #[tokio::test]
    async fn test_limits_and_keeps_duplicates_across_inputs() {
        let related: Vec<(String, u8)> = (0..12).map(|i| (format!("R{}", i), 90 - i as u8)).collect();
        let related: Vec<(&str, u8)> = related.iter().map(|(n, p)| (n.as_str(), *p)).collect();
        let catalog = FakeCatalog::new()
            .with_artist("Queen", &related)
            .with_artist("Muse", &[("R11", 79)]);
        let rec = Recommender::new(Arc::new(catalog), 10, 10);

        let candidates = rec
            .collect_candidates(&names(&["Queen", "Muse", "Queen"]))
            .await
            .unwrap();
        // 10 per Queen mention plus one for Muse.
        assert_eq!(candidates.len(), 21);

        let ranked = rank(candidates, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].name, "R11");
        assert_eq!(ranked[1].name, "R9");
        assert_eq!(ranked[2].name, "R9");
    }

    #[tokio::test]
    async fn test_input_order_drives_lookups() {
        let catalog = Arc::new(FakeCatalog::new());
        let rec = Recommender::new(catalog.clone(), 10, 10);
        let mut phrases = PhraseBank::seeded(1);

        rec.recommend(&names(&["B", "A", "B"]), &mut phrases).await.unwrap();
        assert_eq!(*catalog.lookups.lock().unwrap(), vec!["B", "A", "B"]);
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let rec = Recommender::new(Arc::new(FakeCatalog::failing()), 10, 10);
        let mut phrases = PhraseBank::seeded(1);
        assert!(rec.recommend(&names(&["Queen"]), &mut phrases).await.is_err());
    }

    #[test]
    fn test_rank_is_stable() {
        let c = |n: &str, p| Candidate {
            name: n.into(),
            popularity: p,
        };
        let ranked = rank(vec![c("x", 5), c("y", 1), c("z", 5)], 10);
        let order: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["y", "x", "z"]);
    }
}
