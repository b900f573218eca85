//! Static genre vocabulary shared by the query parser and the recommendation engine.

/// Genre names with the lowercase keywords that identify them in free text.
///
/// Order matters: the query parser picks the first genre with a matching keyword.
pub const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "action",
        &["action", "fight", "adventure", "hero", "battle", "explosive"],
    ),
    (
        "comedy",
        &["funny", "laugh", "humor", "comic", "hilarious", "joke"],
    ),
    (
        "drama",
        &["emotional", "serious", "deep", "touching", "dramatic"],
    ),
    (
        "horror",
        &["scary", "frightening", "horror", "creepy", "nightmare"],
    ),
    (
        "romance",
        &["love", "romantic", "relationship", "romance", "dating"],
    ),
    (
        "sci-fi",
        &["space", "future", "alien", "technology", "robot", "time travel"],
    ),
    (
        "thriller",
        &["suspense", "mystery", "tension", "thrilling", "intense"],
    ),
    (
        "fantasy",
        &["magic", "wizard", "fantasy", "mythical", "supernatural"],
    ),
];

/// Catalog genre ids and their display names.
pub const GENRE_NAMES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Display name for a catalog genre id.
pub fn genre_name(genre_id: u32) -> Option<&'static str> {
    GENRE_NAMES
        .iter()
        .find(|(id, _)| *id == genre_id)
        .map(|(_, name)| *name)
}

/// First genre whose keyword set has a substring match in `lowered`.
pub fn match_genre(lowered: &str) -> Option<&'static str> {
    GENRE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(genre, _)| *genre)
}
