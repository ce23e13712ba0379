//! Response documents returned by the API.
//!
//! Every endpoint answers with the same paging envelope ([`Page`]) around a
//! list of resource-specific documents. Lookups by id use the same envelope
//! with a single document in `docs`.

use serde::{Deserialize, Serialize};

/// The paging envelope shared by every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub docs: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub pages: u64,
}

impl<T> Page<T> {
    /// Returns `true` if there are pages after this one.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// The first document, which is the whole result of a lookup by id.
    pub fn first(&self) -> Option<&T> {
        self.docs.first()
    }

    pub fn into_docs(self) -> Vec<T> {
        self.docs
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A chapter listed under a book; the book is implied by the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookChapter {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub runtime_in_minutes: f64,
    pub budget_in_millions: f64,
    pub box_office_revenue_in_millions: f64,
    pub academy_award_nominations: u32,
    pub academy_award_wins: u32,
    pub rotten_tomatoes_score: f64,
}

/// A character. Descriptive fields are free text and are frequently empty
/// or missing upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth: Option<String>,
    #[serde(default)]
    pub spouse: Option<String>,
    #[serde(default)]
    pub death: Option<String>,
    #[serde(default)]
    pub realm: Option<String>,
    #[serde(default)]
    pub hair: Option<String>,
    #[serde(default)]
    pub wiki_url: Option<String>,
}

/// A line of movie dialog. `movie` and `character` are document ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub dialog: String,
    pub movie: String,
    pub character: String,
    /// Duplicate of `_id` kept by the API for older clients.
    #[serde(rename = "id", default)]
    pub legacy_id: Option<String>,
}

/// A chapter from the top-level chapter collection, carrying its book id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_name: String,
    #[serde(default)]
    pub book: Option<String>,
}

pub type Books = Page<Book>;
pub type BookChapters = Page<BookChapter>;
pub type Movies = Page<Movie>;
pub type Characters = Page<Character>;
pub type Quotes = Page<Quote>;
pub type Chapters = Page<Chapter>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_books_page() {
        let body = r#"{
            "docs": [
                {"_id": "5cf5805fb53e011a64671582", "name": "The Fellowship Of The Ring"},
                {"_id": "5cf58077b53e011a64671583", "name": "The Two Towers"}
            ],
            "total": 3, "limit": 2, "offset": 0, "page": 1, "pages": 2
        }"#;

        let page: Books = serde_json::from_str(body).unwrap();
        assert_eq!(page.docs.len(), 2);
        assert_eq!(page.docs[1].name, "The Two Towers");
        assert_eq!(page.total, 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_decode_lookup_without_full_envelope() {
        let body = r#"{
            "docs": [{"_id": "5cd99d4bde30eff6ebccfbbe", "name": "Frodo Baggins", "race": "Hobbit", "wikiUrl": "http://lotr.wikia.com//wiki/Frodo_Baggins"}],
            "total": 1
        }"#;

        let page: Characters = serde_json::from_str(body).unwrap();
        let frodo = page.first().unwrap();
        assert_eq!(frodo.race.as_deref(), Some("Hobbit"));
        assert_eq!(frodo.spouse, None);
        assert_eq!(
            frodo.wiki_url.as_deref(),
            Some("http://lotr.wikia.com//wiki/Frodo_Baggins")
        );
        assert_eq!(page.pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_decode_movie_and_quote() {
        let movie: Movie = serde_json::from_str(
            r#"{
                "_id": "5cd95395de30eff6ebccde5d",
                "name": "The Return of the King",
                "runtimeInMinutes": 201,
                "budgetInMillions": 94,
                "boxOfficeRevenueInMillions": 1120,
                "academyAwardNominations": 11,
                "academyAwardWins": 11,
                "rottenTomatoesScore": 95
            }"#,
        )
        .unwrap();
        assert_eq!(movie.academy_award_wins, 11);
        assert_eq!(movie.runtime_in_minutes, 201.0);

        let quote: Quote = serde_json::from_str(
            r#"{
                "_id": "5cd96e05de30eff6ebcce7e9",
                "dialog": "Deagol!",
                "movie": "5cd95395de30eff6ebccde5d",
                "character": "5cd99d4bde30eff6ebccfe9e",
                "id": "5cd96e05de30eff6ebcce7e9"
            }"#,
        )
        .unwrap();
        assert_eq!(quote.dialog, "Deagol!");
        assert_eq!(quote.legacy_id.as_deref(), Some(quote.id.as_str()));
    }

    #[test]
    fn test_page_into_iter() {
        let page = Chapters {
            docs: vec![Chapter {
                id: "6091b6d6d58360f988133b8b".to_string(),
                chapter_name: "A Long-expected Party".to_string(),
                book: Some("5cf5805fb53e011a64671582".to_string()),
            }],
            total: 1,
            limit: 1000,
            offset: 0,
            page: 1,
            pages: 1,
        };
        let names: Vec<_> = page.into_iter().map(|c| c.chapter_name).collect();
        assert_eq!(names, vec!["A Long-expected Party"]);
    }
}
