//! Resource paths exposed by the API.

use std::fmt;

/// A resource collection, a single document, or a sub-collection of one
/// document.
///
/// The rendered path is relative to the client's base URL.
///
/// ```
/// use one_api::endpoint::Endpoint;
///
/// assert_eq!(Endpoint::Books(None).path(), "book");
/// assert_eq!(Endpoint::Books(Some("5cf5805fb53e011a64671582")).path(), "book/5cf5805fb53e011a64671582");
/// assert_eq!(Endpoint::MovieQuotes("5cd95395de30eff6ebccde5b").path(), "movie/5cd95395de30eff6ebccde5b/quote");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint<'a> {
    Books(Option<&'a str>),
    BookChapters(&'a str),
    Movies(Option<&'a str>),
    MovieQuotes(&'a str),
    Characters(Option<&'a str>),
    CharacterQuotes(&'a str),
    Quotes(Option<&'a str>),
    Chapters(Option<&'a str>),
}

impl Endpoint<'_> {
    /// The top-level resource segment.
    pub fn resource(&self) -> &'static str {
        match self {
            Endpoint::Books(_) | Endpoint::BookChapters(_) => "book",
            Endpoint::Movies(_) | Endpoint::MovieQuotes(_) => "movie",
            Endpoint::Characters(_) | Endpoint::CharacterQuotes(_) => "character",
            Endpoint::Quotes(_) => "quote",
            Endpoint::Chapters(_) => "chapter",
        }
    }

    /// The document id, if the endpoint names one.
    pub fn id(&self) -> Option<&str> {
        match *self {
            Endpoint::Books(id)
            | Endpoint::Movies(id)
            | Endpoint::Characters(id)
            | Endpoint::Quotes(id)
            | Endpoint::Chapters(id) => id,
            Endpoint::BookChapters(id)
            | Endpoint::MovieQuotes(id)
            | Endpoint::CharacterQuotes(id) => Some(id),
        }
    }

    fn sub_resource(&self) -> Option<&'static str> {
        match self {
            Endpoint::BookChapters(_) => Some("chapter"),
            Endpoint::MovieQuotes(_) | Endpoint::CharacterQuotes(_) => Some("quote"),
            _ => None,
        }
    }

    /// The unescaped path segments: resource, then id, then sub-resource.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.resource())
            .chain(self.id())
            .chain(self.sub_resource())
    }

    /// Renders the path, e.g. `character/{id}/quote`.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())?;
        if let Some(id) = self.id() {
            write!(f, "/{id}")?;
        }
        if let Some(sub) = self.sub_resource() {
            write!(f, "/{sub}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(Endpoint::Books(None).path(), "book");
        assert_eq!(Endpoint::Movies(None).path(), "movie");
        assert_eq!(Endpoint::Characters(None).path(), "character");
        assert_eq!(Endpoint::Quotes(None).path(), "quote");
        assert_eq!(Endpoint::Chapters(None).path(), "chapter");
    }

    #[test]
    fn test_document_paths() {
        assert_eq!(Endpoint::Books(Some("b1")).path(), "book/b1");
        assert_eq!(Endpoint::Movies(Some("m1")).path(), "movie/m1");
        assert_eq!(Endpoint::Characters(Some("c1")).path(), "character/c1");
        assert_eq!(Endpoint::Quotes(Some("q1")).path(), "quote/q1");
        assert_eq!(Endpoint::Chapters(Some("ch1")).path(), "chapter/ch1");
    }

    #[test]
    fn test_segments() {
        let segments: Vec<_> = Endpoint::CharacterQuotes("c/1").segments().collect();
        assert_eq!(segments, vec!["character", "c/1", "quote"]);

        let segments: Vec<_> = Endpoint::Chapters(None).segments().collect();
        assert_eq!(segments, vec!["chapter"]);
    }

    #[test]
    fn test_sub_collection_paths() {
        assert_eq!(Endpoint::BookChapters("b1").path(), "book/b1/chapter");
        assert_eq!(Endpoint::MovieQuotes("m1").path(), "movie/m1/quote");
        assert_eq!(Endpoint::CharacterQuotes("c1").path(), "character/c1/quote");
    }
}
