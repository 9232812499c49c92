use crate::books::domain::Book;
use crate::core::library::LibraryError;

// BookElement is one book cover marker of the listing page
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BookElement {
    pub position: usize,
    pub href: Option<String>,
}

impl BookElement {
    pub fn new(position: usize, href: Option<&str>) -> Self {
        Self {
            position,
            href: href.map(str::to_string),
        }
    }
}

// FetchOutcome is the result of fetching a single detail page. Only `Fetched` carries a
// record; every other variant stands for an item dropped from the batch.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Book),
    MissingLink,
    MissingIsbn {
        url: String,
    },
    NetworkError {
        url: String,
        error: LibraryError,
    },
    ParseError {
        url: String,
        error: LibraryError,
    },
}

impl FetchOutcome {
    pub fn into_book(self) -> Option<Book> {
        match self {
            FetchOutcome::Fetched(book) => Some(book),
            _ => None,
        }
    }
}
