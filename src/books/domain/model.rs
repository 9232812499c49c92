use std::fmt;
use std::fmt::{Display, Formatter};
use crate::core::domain::Identifiable;

// Book abstracts a catalog title keyed by its ISBN. Apart from availability the fields
// are free-form text exactly as they were scraped.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year_published: String,
    availability: bool,
}

impl Book {
    pub fn new(isbn: &str, title: &str, author: &str, genre: &str, year_published: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year_published: year_published.to_string(),
            availability: true,
        }
    }

    pub fn set_availability(&mut self, availability: bool) {
        self.availability = availability;
    }

    pub fn availability(&self) -> bool {
        self.availability
    }
}

impl Identifiable for Book {
    fn id(&self) -> String {
        self.isbn.to_string()
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}.\nGenre: {} \nYear: {} \nISBN: {}",
               self.title, self.author, self.genre, self.year_published, self.isbn)
    }
}
