use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::analyzer::FavoritesAnalyzer;
use crate::catalog::{RECOMMENDATION_COUNT, RecommendationCatalog};
use crate::error::{DiscoveryError, Result};
use crate::models::{MovieSummary, Recommendation};

/// Entries sampled from each top genre bucket.
const PICKS_PER_GENRE: usize = 2;

/// Rule-based recommender over a static [`RecommendationCatalog`].
///
/// Output is randomised: two calls with the same favorites may differ, but
/// every list holds exactly five distinct titles.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    analyzer: FavoritesAnalyzer,
    catalog: RecommendationCatalog,
}

impl RecommendationEngine {
    pub fn new(catalog: RecommendationCatalog) -> Self {
        Self {
            analyzer: FavoritesAnalyzer::new(),
            catalog,
        }
    }

    pub fn recommend(&self, favorites: &[MovieSummary]) -> Result<Vec<Recommendation>> {
        self.recommend_with_rng(favorites, &mut rand::rng())
    }

    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        favorites: &[MovieSummary],
        rng: &mut R,
    ) -> Result<Vec<Recommendation>> {
        let top_genres = self.analyzer.top_genres(favorites)?;

        let mut picked = Picked::default();
        for genre_id in &top_genres {
            if let Some(bucket) = self.catalog.bucket(*genre_id) {
                for rec in bucket.choose_multiple(rng, PICKS_PER_GENRE) {
                    picked.push(rec.clone());
                }
            }
        }
        debug!(from_genres = picked.len(), "Picked genre recommendations");

        let mut general = self.catalog.general().to_vec();
        general.shuffle(rng);
        picked.extend_until_full(general);

        if !picked.is_full() {
            let mut rest: Vec<Recommendation> = self.catalog.bucket_entries().cloned().collect();
            rest.shuffle(rng);
            picked.extend_until_full(rest);
        }

        let mut recommendations = picked.into_inner();
        if recommendations.len() < RECOMMENDATION_COUNT {
            return Err(DiscoveryError::InsufficientCandidates {
                found: recommendations.len(),
                required: RECOMMENDATION_COUNT,
            });
        }
        recommendations.truncate(RECOMMENDATION_COUNT);

        personalize(&mut recommendations, favorites, rng);
        info!(
            count = recommendations.len(),
            top_genres = ?top_genres,
            "Generated local recommendations"
        );
        Ok(recommendations)
    }

    /// Fills `recommendations` up to the standard length with local picks,
    /// skipping titles already present (case-insensitive).
    pub fn top_up(
        &self,
        mut recommendations: Vec<Recommendation>,
        favorites: &[MovieSummary],
    ) -> Result<Vec<Recommendation>> {
        if recommendations.len() >= RECOMMENDATION_COUNT {
            recommendations.truncate(RECOMMENDATION_COUNT);
            return Ok(recommendations);
        }
        let mut seen: HashSet<String> = recommendations
            .iter()
            .map(|rec| rec.title.to_lowercase())
            .collect();
        for rec in self.recommend(favorites)? {
            if recommendations.len() == RECOMMENDATION_COUNT {
                break;
            }
            if seen.insert(rec.title.to_lowercase()) {
                recommendations.push(rec);
            }
        }
        Ok(recommendations)
    }
}

fn personalize<R: Rng + ?Sized>(
    recommendations: &mut [Recommendation],
    favorites: &[MovieSummary],
    rng: &mut R,
) {
    for rec in recommendations.iter_mut() {
        if let Some(favorite) = favorites.choose(rng) {
            rec.reason = format!("{} Based on your love for {}.", rec.reason, favorite.title);
        }
    }
}

/// Insertion-ordered list that rejects repeated titles.
#[derive(Default)]
struct Picked {
    titles: HashSet<String>,
    items: Vec<Recommendation>,
}

impl Picked {
    fn push(&mut self, rec: Recommendation) {
        if self.titles.insert(rec.title.clone()) {
            self.items.push(rec);
        }
    }

    fn extend_until_full(&mut self, candidates: Vec<Recommendation>) {
        for rec in candidates {
            if self.is_full() {
                break;
            }
            self.push(rec);
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= RECOMMENDATION_COUNT
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn into_inner(self) -> Vec<Recommendation> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    const ACTION_TITLES: [&str; 4] = [
        "John Wick",
        "Mad Max: Fury Road",
        "Mission: Impossible - Fallout",
        "The Raid",
    ];

    fn assert_valid(recs: &[Recommendation]) {
        assert_eq!(recs.len(), RECOMMENDATION_COUNT);
        let titles: HashSet<_> = recs.iter().map(|r| &r.title).collect();
        assert_eq!(titles.len(), RECOMMENDATION_COUNT, "duplicate titles in {recs:?}");
    }

    #[test]
    fn empty_favorites_is_input_error() {
        let err = RecommendationEngine::default().recommend(&[]).unwrap_err();
        assert!(matches!(err, DiscoveryError::Input(_)));
    }

    #[test]
    fn mad_max_fan_gets_action_picks() {
        let engine = RecommendationEngine::default();
        let favorites = [MovieSummary::new(1, "Mad Max: Fury Road", vec![28])];
        for seed in 0..50 {
            let recs = engine
                .recommend_with_rng(&favorites, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_valid(&recs);
            let action = recs
                .iter()
                .filter(|r| ACTION_TITLES.contains(&r.title.as_str()))
                .count();
            assert!(action >= 2, "seed {seed}: {recs:?}");
            assert!(
                recs.iter()
                    .all(|r| r.reason.ends_with("Based on your love for Mad Max: Fury Road."))
            );
        }
    }

    #[test]
    fn always_five_distinct_titles() {
        let engine = RecommendationEngine::default();
        let cases: Vec<Vec<MovieSummary>> = vec![
            vec![MovieSummary::new(1, "Unknown genres", vec![])],
            vec![MovieSummary::new(1, "Doc", vec![99, 10402])],
            vec![
                MovieSummary::new(1, "A", vec![28, 35, 18]),
                MovieSummary::new(2, "B", vec![878, 27, 53]),
            ],
            vec![MovieSummary::new(1, "Everything", vec![28, 35, 18, 878, 27, 53])],
        ];
        for favorites in &cases {
            for seed in 0..20 {
                let recs = engine
                    .recommend_with_rng(favorites, &mut StdRng::seed_from_u64(seed))
                    .unwrap();
                assert_valid(&recs);
            }
        }
    }

    #[test]
    fn small_general_pool_is_topped_up_from_buckets() {
        let buckets = BTreeMap::from([(
            35,
            ["W", "X", "Y", "Z"]
                .iter()
                .map(|t| Recommendation::new(*t, "bucket"))
                .collect(),
        )]);
        let general = vec![Recommendation::new("G", "general")];
        let engine = RecommendationEngine::new(RecommendationCatalog::new(buckets, general).unwrap());

        // no favorite genre matches a bucket, so the general pool alone is too small
        let favorites = [MovieSummary::new(1, "Fav", vec![28])];
        let recs = engine
            .recommend_with_rng(&favorites, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_valid(&recs);
    }

    #[test]
    fn top_up_keeps_existing_and_fills_distinct() {
        let engine = RecommendationEngine::default();
        let favorites = [MovieSummary::new(1, "Arrival", vec![878])];
        let existing = vec![Recommendation::new("Ex Machina", "remote pick")];
        let recs = engine.top_up(existing, &favorites).unwrap();
        assert_valid(&recs);
        assert_eq!(recs[0].reason, "remote pick");
    }
}
