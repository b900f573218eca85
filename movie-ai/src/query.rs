//! Rule-based natural-language query parsing.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::lexicon;
use crate::models::ParsedQuery;

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}|\d{2}s|19\d{2}|20\d{2}").expect("Invalid regex"));

static FILLER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:movies?|films?|from|the|in)\b").expect("Invalid regex")
});

static YEAR_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{4}s?|\d{2}s)\b").expect("Invalid regex"));

static MOOD_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:funny|scary|romantic|action)\b").expect("Invalid regex")
});

/// Mood phrase groups, checked in priority order.
const MOODS: &[(&str, &[&str])] = &[
    ("feel-good", &["feel good", "uplifting"]),
    ("dark", &["dark", "serious"]),
    ("light", &["light", "fun"]),
];

/// Turns free text such as "scary movies from the 90s" into search parameters.
///
/// Parsing never fails: an empty query yields `popular` as the search terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        let lowered = query.to_lowercase();

        let genre = lexicon::match_genre(&lowered).map(str::to_string);
        let year_range = YEAR_TOKEN.find(&lowered).map(|m| m.as_str().to_string());
        let mood = MOODS
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|phrase| lowered.contains(phrase)))
            .map(|(mood, _)| mood.to_string());

        let search_terms = clean_search_terms(query);
        let search_terms = if search_terms.is_empty() {
            genre.clone().unwrap_or_else(|| "popular".to_string())
        } else {
            search_terms
        };

        let parsed = ParsedQuery {
            search_terms,
            genre,
            year_range,
            mood,
        };
        debug!(query = %query, parsed = ?parsed, "Parsed natural language query");
        parsed
    }
}

fn clean_search_terms(query: &str) -> String {
    let without_filler = FILLER_WORDS.replace_all(query, " ");
    let without_years = YEAR_WORDS.replace_all(&without_filler, " ");
    let without_moods = MOOD_WORDS.replace_all(&without_years, " ");
    without_moods.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ParsedQuery {
        QueryParser::new().parse(query)
    }

    #[test]
    fn empty_query_falls_back_to_popular() {
        let parsed = parse("");
        assert_eq!(parsed.search_terms, "popular");
        assert_eq!(parsed.genre, None);
        assert_eq!(parsed.year_range, None);
        assert_eq!(parsed.mood, None);
    }

    #[test]
    fn funny_movie_is_comedy() {
        assert_eq!(parse("a funny movie").genre.as_deref(), Some("comedy"));
    }

    #[test]
    fn scary_nineties_is_horror_with_decade() {
        let parsed = parse("scary movies from the 90s");
        assert_eq!(parsed.genre.as_deref(), Some("horror"));
        assert!(parsed.year_range.unwrap().contains("90s"));
    }

    #[test]
    fn cleaning_strips_filler_years_and_moods() {
        let parsed = parse("funny movies from the 90s");
        for word in ["funny", "movies", "from", "the", "90s"] {
            assert!(
                !parsed.search_terms.split_whitespace().any(|w| w.eq_ignore_ascii_case(word)),
                "{word} left in {:?}",
                parsed.search_terms
            );
        }
        // nothing left, so the detected genre becomes the search term
        assert_eq!(parsed.search_terms, "comedy");
    }

    #[test]
    fn keeps_meaningful_terms() {
        let parsed = parse("Space Adventure Films In The 1980s with Harrison Ford");
        assert_eq!(parsed.search_terms, "Space Adventure with Harrison Ford");
        assert_eq!(parsed.genre.as_deref(), Some("action"));
        assert_eq!(parsed.year_range.as_deref(), Some("1980"));
    }

    #[test]
    fn year_is_not_validated() {
        assert_eq!(parse("movies from 9999").year_range.as_deref(), Some("9999"));
    }

    #[test]
    fn mood_priority_order() {
        assert_eq!(parse("uplifting but dark").mood.as_deref(), Some("feel-good"));
        assert_eq!(parse("a serious light story").mood.as_deref(), Some("dark"));
        assert_eq!(parse("something fun").mood.as_deref(), Some("light"));
        assert_eq!(parse("heist").mood, None);
    }

    #[test]
    fn filler_removal_is_whole_word() {
        // "the" inside "theater" and "in" inside "inception" must survive
        let parsed = parse("inception theater");
        assert_eq!(parsed.search_terms, "inception theater");
    }
}
