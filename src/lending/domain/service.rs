use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::Utc;
use tracing::{info, warn};
use crate::books::domain::Book;
use crate::catalog::domain::Catalog;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::library::{LibraryError, LibraryResult};
use crate::loans::domain::{Loan, LoanDetails};
use crate::patrons::domain::Patron;

// Library orchestrates loans and returns over the catalog, which is the only store of
// records. Loan ids come from a counter owned by this instance.
#[derive(Debug)]
pub struct Library {
    name: String,
    book_loan_days: i64,
    catalog: Catalog,
    loan_counter: u64,
}

impl Library {
    pub fn new(config: &Configuration) -> Self {
        Self {
            name: config.library_name.to_string(),
            book_loan_days: config.book_loan_days,
            catalog: Catalog::new(),
            loan_counter: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn add_book(&mut self, book: Book) -> LibraryResult<()> {
        if self.catalog.get_book(book.isbn.as_str()).is_some() {
            return Err(LibraryError::duplicate_key(
                format!("book with isbn {} already exists", book.isbn).as_str()));
        }
        self.catalog.add_book(book);
        Ok(())
    }

    pub fn add_patron(&mut self, patron: Patron) -> LibraryResult<()> {
        if self.catalog.get_patron(patron.patron_id.as_str()).is_some() {
            return Err(LibraryError::duplicate_key(
                format!("patron with id {} already exists", patron.patron_id).as_str()));
        }
        self.catalog.add_patron(patron);
        Ok(())
    }

    pub fn loan_book(&mut self, isbn: &str, patron_id: &str) -> LibraryResult<Loan> {
        let (book, patron) = self.catalog.book_and_patron_mut(isbn, patron_id)?;
        if !book.availability() {
            warn!(isbn, patron_id, "book is not available for loan");
            return Err(LibraryError::unavailable(
                format!("book is not available for loan {}", book.id()).as_str()));
        }
        self.loan_counter += 1;
        let loan = Loan::new(self.loan_counter.to_string().as_str(), book, patron,
                             Utc::now().naive_utc(), self.book_loan_days);
        patron.borrow_book(book);
        info!(loan_id = loan.loan_id.as_str(), isbn, patron_id, due_date = %loan.due_date, "book loaned");
        self.catalog.add_loan(loan.clone());
        Ok(loan)
    }

    pub fn return_book(&mut self, isbn: &str, patron_id: &str) -> LibraryResult<Loan> {
        let loan_id = match self.catalog.loans().find(|loan| loan.is_for(isbn, patron_id)) {
            Some(loan) => loan.id(),
            None => {
                warn!(isbn, patron_id, "no active loan to return");
                return Err(LibraryError::not_found(
                    format!("loan of book {} for patron {} not found", isbn, patron_id).as_str()));
            }
        };
        let (book, patron) = self.catalog.book_and_patron_mut(isbn, patron_id)?;
        patron.return_book(book);
        info!(loan_id = loan_id.as_str(), isbn, patron_id, "book returned");
        self.catalog.remove_loan(loan_id.as_str()).ok_or_else(
            || LibraryError::runtime(format!("loan {} vanished during return", loan_id).as_str()))
    }

    pub fn search_book(&self, title: &str) -> Option<&Book> {
        let needle = title.to_lowercase();
        self.catalog.books().find(|book| book.title.to_lowercase().contains(needle.as_str()))
    }

    pub fn search_patron(&self, name: &str) -> Option<&Patron> {
        let needle = name.to_lowercase();
        self.catalog.patrons().find(|patron| patron.name.to_lowercase().contains(needle.as_str()))
    }

    pub fn find_book(&self, isbn: &str) -> Option<&Book> {
        self.catalog.get_book(isbn)
    }

    pub fn find_patron(&self, patron_id: &str) -> Option<&Patron> {
        self.catalog.get_patron(patron_id)
    }

    pub fn books(&self) -> Vec<&Book> {
        self.catalog.books().collect()
    }

    pub fn patrons(&self) -> Vec<&Patron> {
        self.catalog.patrons().collect()
    }

    pub fn loans(&self) -> Vec<&Loan> {
        self.catalog.loans().collect()
    }

    pub fn borrowed_books(&self, patron_id: &str) -> Vec<&Book> {
        self.catalog.get_patron(patron_id)
            .map(|patron| patron.books_borrowed().iter()
                .filter_map(|isbn| self.catalog.get_book(isbn))
                .collect())
            .unwrap_or_default()
    }

    pub fn loan_details(&self, loan_id: &str) -> Option<LoanDetails> {
        let loan = self.catalog.get_loan(loan_id)?;
        let book = self.catalog.get_book(loan.isbn.as_str())?;
        let patron = self.catalog.get_patron(loan.patron_id.as_str())?;
        Some(loan.details(book, patron))
    }

    /// Active loans with titles and names resolved, as a JSON array in loan order.
    pub fn loans_report(&self) -> LibraryResult<String> {
        let details: Vec<LoanDetails> = self.catalog.loans()
            .filter_map(|loan| self.loan_details(loan.loan_id.as_str()))
            .collect();
        Ok(serde_json::to_string_pretty(&details)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Display for Library {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Library: {}\n{}", self.name, self.catalog)
    }
}
