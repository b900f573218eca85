//! Curated recommendation stock used by the local rule engine.

use std::collections::{BTreeMap, HashSet};

use crate::error::{DiscoveryError, Result};
use crate::models::Recommendation;

/// Length of every recommendation list the engine produces.
pub const RECOMMENDATION_COUNT: usize = 5;

const ACTION: &[(&str, &str)] = &[
    ("John Wick", "Stylish action with excellent choreography and compelling revenge story."),
    ("Mad Max: Fury Road", "High-octane action with stunning visuals and practical effects."),
    ("Mission: Impossible - Fallout", "Intense action sequences with incredible stunts and pacing."),
    ("The Raid", "Non-stop martial arts action with incredible fight choreography."),
];

const COMEDY: &[(&str, &str)] = &[
    ("The Grand Budapest Hotel", "Quirky comedy with beautiful cinematography and witty dialogue."),
    ("Knives Out", "Clever comedy-mystery with sharp wit and excellent ensemble cast."),
    ("What We Do in the Shadows", "Hilarious mockumentary about vampires with clever humor."),
    ("Game Night", "Smart comedy with great twists and fantastic chemistry between leads."),
];

const DRAMA: &[(&str, &str)] = &[
    ("Parasite", "Brilliant social drama with perfect blend of tension and dark humor."),
    ("Moonlight", "Beautiful coming-of-age drama with exceptional performances."),
    ("Manchester by the Sea", "Powerful emotional drama with outstanding acting and writing."),
    ("Room", "Intense drama about resilience with incredible mother-son relationship."),
];

const SCIENCE_FICTION: &[(&str, &str)] = &[
    ("Ex Machina", "Thought-provoking AI thriller with stunning visuals and smart writing."),
    ("Arrival", "Intelligent alien contact film focusing on language and communication."),
    ("Blade Runner 2049", "Visually stunning sequel that expands on the original's themes."),
    ("Her", "Touching sci-fi romance about AI and human connection."),
];

const HORROR: &[(&str, &str)] = &[
    ("Hereditary", "Terrifying psychological horror with incredible family dynamics."),
    ("The Witch", "Atmospheric period horror with authentic historical feel."),
    ("Get Out", "Smart social thriller that blends horror with important themes."),
    ("A Quiet Place", "Innovative horror with unique sound design and family story."),
];

const THRILLER: &[(&str, &str)] = &[
    ("Gone Girl", "Psychological thriller with twisty plot and dark relationship themes."),
    ("Prisoners", "Intense crime thriller with moral complexity and great performances."),
    ("Zodiac", "Methodical investigation thriller with excellent attention to detail."),
    ("Nightcrawler", "Dark thriller about media ethics with outstanding lead performance."),
];

const GENERAL: &[(&str, &str)] = &[
    ("The Shawshank Redemption", "Universally acclaimed drama about hope and friendship."),
    ("Inception", "Mind-bending thriller with complex storytelling and stunning visuals."),
    ("Spirited Away", "Beautiful animated film with imaginative world-building."),
    ("The Godfather", "Classic crime drama with exceptional storytelling and performances."),
    ("Pulp Fiction", "Genre-defining crime story with sharp dialogue and bold structure."),
];

fn entries(raw: &[(&str, &str)]) -> Vec<Recommendation> {
    raw.iter()
        .map(|(title, reason)| Recommendation::new(*title, *reason))
        .collect()
}

/// Per-genre recommendation buckets plus a general pool for topping up.
#[derive(Debug, Clone)]
pub struct RecommendationCatalog {
    buckets: BTreeMap<u32, Vec<Recommendation>>,
    general: Vec<Recommendation>,
}

impl RecommendationCatalog {
    /// Builds a catalog, rejecting stock that cannot fill a full list.
    pub fn new(
        buckets: BTreeMap<u32, Vec<Recommendation>>,
        general: Vec<Recommendation>,
    ) -> Result<Self> {
        let catalog = Self { buckets, general };
        let found = catalog.distinct_titles();
        if found < RECOMMENDATION_COUNT {
            return Err(DiscoveryError::InsufficientCandidates {
                found,
                required: RECOMMENDATION_COUNT,
            });
        }
        Ok(catalog)
    }

    /// The curated stock shipped with the crate.
    pub fn builtin() -> Self {
        let buckets = BTreeMap::from([
            (28, entries(ACTION)),
            (35, entries(COMEDY)),
            (18, entries(DRAMA)),
            (878, entries(SCIENCE_FICTION)),
            (27, entries(HORROR)),
            (53, entries(THRILLER)),
        ]);
        Self {
            buckets,
            general: entries(GENERAL),
        }
    }

    pub fn bucket(&self, genre_id: u32) -> Option<&[Recommendation]> {
        self.buckets
            .get(&genre_id)
            .map(Vec::as_slice)
            .filter(|bucket| !bucket.is_empty())
    }

    pub fn general(&self) -> &[Recommendation] {
        &self.general
    }

    /// Every bucket entry, in genre id order.
    pub fn bucket_entries(&self) -> impl Iterator<Item = &Recommendation> {
        self.buckets.values().flatten()
    }

    pub fn distinct_titles(&self) -> usize {
        self.general
            .iter()
            .chain(self.bucket_entries())
            .map(|rec| rec.title.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl Default for RecommendationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_general_pool_can_fill_a_list_alone() {
        let catalog = RecommendationCatalog::builtin();
        let general: HashSet<_> = catalog.general().iter().map(|r| &r.title).collect();
        assert!(general.len() >= RECOMMENDATION_COUNT);
    }

    #[test]
    fn builtin_buckets() {
        let catalog = RecommendationCatalog::builtin();
        let action = catalog.bucket(28).unwrap();
        assert_eq!(action.len(), 4);
        assert_eq!(action[0].title, "John Wick");
        assert!(catalog.bucket(12).is_none());
        assert_eq!(catalog.distinct_titles(), 29);
    }

    #[test]
    fn rejects_catalog_too_small_to_fill() {
        let general = vec![
            Recommendation::new("A", "a"),
            Recommendation::new("B", "b"),
            Recommendation::new("A", "duplicate"),
        ];
        let buckets = BTreeMap::from([(28, vec![Recommendation::new("B", "b")])]);
        let err = RecommendationCatalog::new(buckets, general).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::InsufficientCandidates { found: 2, required: 5 }
        ));
    }

    #[test]
    fn accepts_catalog_filled_from_buckets() {
        let buckets = BTreeMap::from([(
            35,
            vec![
                Recommendation::new("A", "a"),
                Recommendation::new("B", "b"),
                Recommendation::new("C", "c"),
                Recommendation::new("D", "d"),
                Recommendation::new("E", "e"),
            ],
        )]);
        assert!(RecommendationCatalog::new(buckets, Vec::new()).is_ok());
    }
}
