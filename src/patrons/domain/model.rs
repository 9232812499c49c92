use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::warn;
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::password::hash_password;

// Patron abstracts library member. Borrowed books are kept as ISBN keys into the catalog.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Patron {
    pub patron_id: String,
    pub name: String,
    pub phone_number: String,
    password_hash: String,
    books_borrowed: Vec<String>,
}

impl Patron {
    pub fn new(patron_id: &str, name: &str, phone_number: &str, password: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            password_hash: hash_password(password),
            books_borrowed: vec![],
        }
    }

    /// Records the book as borrowed and marks it unavailable. An unavailable book is
    /// logged and left untouched; returns whether anything changed.
    pub fn borrow_book(&mut self, book: &mut Book) -> bool {
        if !book.availability() {
            warn!(isbn = book.isbn.as_str(), patron_id = self.patron_id.as_str(), "book is not available");
            return false;
        }
        self.books_borrowed.push(book.isbn.to_string());
        book.set_availability(false);
        true
    }

    /// Removes the book from the borrowed list and marks it available again. A book the
    /// patron does not hold is logged and left untouched.
    pub fn return_book(&mut self, book: &mut Book) -> bool {
        match self.books_borrowed.iter().position(|isbn| *isbn == book.isbn) {
            Some(pos) => {
                self.books_borrowed.remove(pos);
                book.set_availability(true);
                true
            }
            None => {
                warn!(isbn = book.isbn.as_str(), patron_id = self.patron_id.as_str(), "book is not borrowed");
                false
            }
        }
    }

    pub fn books_borrowed(&self) -> &[String] {
        &self.books_borrowed
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.books_borrowed.iter().any(|borrowed| borrowed == isbn)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }
}

impl Identifiable for Patron {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }
}

impl Display for Patron {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let borrowed = if self.books_borrowed.is_empty() {
            "None".to_string()
        } else {
            format!("{:?}", self.books_borrowed)
        };
        write!(f, "Name: {}\nID: {}\nPhone Number: {}\nBorrowed: {}",
               self.name, self.patron_id, self.phone_number, borrowed)
    }
}
