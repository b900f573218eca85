use serde::{Deserialize, Serialize};
use std::fmt;

/// Movie as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    pub fn new(id: u64, title: impl Into<String>, genre_ids: Vec<u32>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            genre_ids,
            overview: None,
        }
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    /// Year taken from the leading four digits of `release_date`.
    ///
    /// Values at or before 1900 are treated as missing.
    pub fn release_year(&self) -> Option<u32> {
        let date = self.release_date.as_deref()?;
        let digits = date.get(..4)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().filter(|year| *year > 1900)
    }

    /// `Title (Year)` when the year is known, otherwise just the title.
    pub fn display_title(&self) -> String {
        match self.release_year() {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub reason: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

/// Structured search parameters extracted from a free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    #[serde(default)]
    pub search_terms: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year_range: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

impl ParsedQuery {
    /// Trims every field, turns empty optionals into `None` and makes sure
    /// `search_terms` is never empty.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let genre = clean(self.genre);
        let mut search_terms = self.search_terms.trim().to_string();
        if search_terms.is_empty() {
            search_terms = genre.clone().unwrap_or_else(|| "popular".to_string());
        }

        Self {
            search_terms,
            genre,
            year_range: clean(self.year_range),
            mood: clean(self.mood),
        }
    }
}

/// Which provider tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Cloud,
    Inference,
    Local,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Cloud => "cloud",
            ProviderKind::Inference => "inference",
            ProviderKind::Local => "local",
        };
        f.write_str(name)
    }
}

/// A router result tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Routed<T> {
    pub value: T,
    pub provider: ProviderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_uses_leading_digits() {
        let movie = MovieSummary::new(1, "Heat", vec![80]).with_release_date("1995-12-15");
        assert_eq!(movie.release_year(), Some(1995));
        assert_eq!(movie.display_title(), "Heat (1995)");
    }

    #[test]
    fn release_year_rejects_implausible_values() {
        let early = MovieSummary::new(1, "Old", vec![]).with_release_date("1899-01-01");
        let junk = MovieSummary::new(2, "Junk", vec![]).with_release_date("n/a");
        let missing = MovieSummary::new(3, "Missing", vec![]);
        assert_eq!(early.release_year(), None);
        assert_eq!(junk.release_year(), None);
        assert_eq!(missing.display_title(), "Missing");
    }

    #[test]
    fn parsed_query_deserializes_camel_case_and_normalizes() {
        let raw = r#"{"searchTerms":"  ","genre":"horror","yearRange":"","mood":null}"#;
        let parsed: ParsedQuery = serde_json::from_str(raw).unwrap();
        let parsed = parsed.normalized();
        assert_eq!(parsed.search_terms, "horror");
        assert_eq!(parsed.genre.as_deref(), Some("horror"));
        assert_eq!(parsed.year_range, None);
        assert_eq!(parsed.mood, None);
    }

    #[test]
    fn movie_summary_accepts_catalog_wire_form() {
        let raw = r#"{"id":76341,"title":"Mad Max: Fury Road","release_date":"2015-05-13","genre_ids":[28,12,878]}"#;
        let movie: MovieSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.genre_ids, vec![28, 12, 878]);
        assert_eq!(movie.overview, None);
    }
}
