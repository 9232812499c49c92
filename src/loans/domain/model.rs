use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::patrons::domain::Patron;
use crate::utils::date::serializer;

// Loan abstracts an active checkout of a book by a patron. It is immutable and removed
// from the catalog when the book comes back.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Loan {
    pub loan_id: String,
    pub isbn: String,
    pub patron_id: String,
    pub loan_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
}

impl Loan {
    pub fn new(loan_id: &str, book: &Book, patron: &Patron, loan_date: NaiveDateTime, loan_days: i64) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            isbn: book.isbn.to_string(),
            patron_id: patron.patron_id.to_string(),
            loan_date,
            due_date: loan_date + Duration::days(loan_days),
        }
    }

    pub fn is_for(&self, isbn: &str, patron_id: &str) -> bool {
        self.isbn == isbn && self.patron_id == patron_id
    }

    pub fn details(&self, book: &Book, patron: &Patron) -> LoanDetails {
        LoanDetails {
            loan_id: self.loan_id.to_string(),
            book: book.title.to_string(),
            patron: patron.name.to_string(),
            loan_date: self.loan_date,
            due_date: self.due_date,
        }
    }
}

impl Identifiable for Loan {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }
}

impl Display for Loan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Loan ID {}: {} to {}\nDue Date: {}", self.loan_id, self.isbn, self.patron_id, self.due_date)
    }
}

// LoanDetails is the report shape of a loan with titles and names resolved
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct LoanDetails {
    pub loan_id: String,
    pub book: String,
    pub patron: String,
    #[serde(with = "serializer")]
    pub loan_date: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_date: NaiveDateTime,
}

impl Display for LoanDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Loan ID {}: {} to {}\nDue Date: {}", self.loan_id, self.book, self.patron, self.due_date)
    }
}
