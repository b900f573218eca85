use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::models::MovieSummary;

/// Maximum number of genres that drive a recommendation run.
pub const TOP_GENRE_LIMIT: usize = 3;

/// Occurrence count per catalog genre id across a set of favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreProfile {
    counts: BTreeMap<u32, u32>,
}

impl GenreProfile {
    pub fn from_movies(movies: &[MovieSummary]) -> Self {
        let mut counts = BTreeMap::new();
        for movie in movies {
            for genre_id in &movie.genre_ids {
                *counts.entry(*genre_id).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, genre_id: u32) -> u32 {
        self.counts.get(&genre_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Genre ids ordered by count descending, ties by ascending id.
    pub fn ranked(&self) -> Vec<u32> {
        let mut entries: Vec<(u32, u32)> = self.counts.iter().map(|(id, n)| (*id, *n)).collect();
        entries.sort_by(|(a_id, a_count), (b_id, b_count)| {
            b_count.cmp(a_count).then(a_id.cmp(b_id))
        });
        entries.into_iter().map(|(id, _)| id).collect()
    }

    pub fn top(&self, limit: usize) -> Vec<u32> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        ranked
    }
}

/// Derives genre preferences from a user's favorites.
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoritesAnalyzer;

impl FavoritesAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn profile(&self, favorites: &[MovieSummary]) -> Result<GenreProfile> {
        if favorites.is_empty() {
            return Err(DiscoveryError::Input(
                "Please add some favorite movies first".to_string(),
            ));
        }
        let profile = GenreProfile::from_movies(favorites);
        debug!(favorites = favorites.len(), genres = ?profile.counts, "Genre analysis");
        Ok(profile)
    }

    /// Up to three most frequent genre ids among the favorites.
    pub fn top_genres(&self, favorites: &[MovieSummary]) -> Result<Vec<u32>> {
        let top = self.profile(favorites)?.top(TOP_GENRE_LIMIT);
        debug!(top_genres = ?top, "Top genres");
        Ok(top)
    }
}
