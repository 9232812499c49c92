use std::fmt;
use std::fmt::{Display, Formatter};
use indexmap::IndexMap;
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::loans::domain::Loan;
use crate::patrons::domain::Patron;

// Catalog is the single store of books, patrons and active loans, each indexed by its
// primary key. Iteration follows insertion order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    books: IndexMap<String, Book>,
    patrons: IndexMap<String, Patron>,
    loans: IndexMap<String, Loan>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_book(&mut self, book: Book) -> Option<Book> {
        self.books.insert(book.id(), book)
    }

    pub fn remove_book(&mut self, isbn: &str) -> Option<Book> {
        self.books.shift_remove(isbn)
    }

    pub fn get_book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn get_book_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn add_patron(&mut self, patron: Patron) -> Option<Patron> {
        self.patrons.insert(patron.id(), patron)
    }

    pub fn remove_patron(&mut self, patron_id: &str) -> Option<Patron> {
        self.patrons.shift_remove(patron_id)
    }

    pub fn get_patron(&self, patron_id: &str) -> Option<&Patron> {
        self.patrons.get(patron_id)
    }

    pub fn get_patron_mut(&mut self, patron_id: &str) -> Option<&mut Patron> {
        self.patrons.get_mut(patron_id)
    }

    pub fn add_loan(&mut self, loan: Loan) -> Option<Loan> {
        self.loans.insert(loan.id(), loan)
    }

    pub fn remove_loan(&mut self, loan_id: &str) -> Option<Loan> {
        self.loans.shift_remove(loan_id)
    }

    pub fn get_loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.get(loan_id)
    }

    // book_and_patron_mut hands out both records at once for loan and return bookkeeping
    pub fn book_and_patron_mut(&mut self, isbn: &str, patron_id: &str) -> LibraryResult<(&mut Book, &mut Patron)> {
        let book = self.books.get_mut(isbn).ok_or_else(
            || LibraryError::not_found(format!("book with isbn {} not found", isbn).as_str()))?;
        let patron = self.patrons.get_mut(patron_id).ok_or_else(
            || LibraryError::not_found(format!("patron with id {} not found", patron_id).as_str()))?;
        Ok((book, patron))
    }

    pub fn books(&self) -> impl Iterator<Item=&Book> {
        self.books.values()
    }

    pub fn patrons(&self) -> impl Iterator<Item=&Patron> {
        self.patrons.values()
    }

    pub fn loans(&self) -> impl Iterator<Item=&Loan> {
        self.loans.values()
    }

    pub fn num_books(&self) -> usize {
        self.books.len()
    }

    pub fn num_patrons(&self) -> usize {
        self.patrons.len()
    }

    pub fn num_loans(&self) -> usize {
        self.loans.len()
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Catalog:\n->{} books\n->{} patrons\n->{} loans",
               self.books.len(), self.patrons.len(), self.loans.len())
    }
}
