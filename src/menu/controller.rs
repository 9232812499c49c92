use std::io::{BufRead, Write};
use tracing::info;
use crate::core::library::{LibraryError, LibraryResult};
use crate::lending::domain::Library;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MenuChoice {
    ViewBooks,
    Borrow,
    Return,
    ViewBorrowed,
    Exit,
    Invalid,
}

impl From<&str> for MenuChoice {
    fn from(s: &str) -> Self {
        match s.trim() {
            "1" => MenuChoice::ViewBooks,
            "2" => MenuChoice::Borrow,
            "3" => MenuChoice::Return,
            "4" => MenuChoice::ViewBorrowed,
            "5" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

// prompt writes the question and reads one trimmed line, None at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> LibraryResult<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_menu<W: Write>(output: &mut W) -> LibraryResult<()> {
    writeln!(output, "\n=== Library Menu ===")?;
    writeln!(output, "1. View all books")?;
    writeln!(output, "2. Borrow a book")?;
    writeln!(output, "3. Return a book")?;
    writeln!(output, "4. View my borrowed books")?;
    writeln!(output, "5. Exit")?;
    Ok(())
}

fn print_patron<W: Write>(library: &Library, patron_id: &str, output: &mut W) -> LibraryResult<()> {
    let patron = library.find_patron(patron_id).ok_or_else(
        || LibraryError::not_found(format!("patron with id {} not found", patron_id).as_str()))?;
    let titles: Vec<&str> = library.borrowed_books(patron_id).iter().map(|b| b.title.as_str()).collect();
    let borrowed = if titles.is_empty() { "None".to_string() } else { format!("{:?}", titles) };
    writeln!(output, "Name: {}\nID: {}\nPhone Number: {}\nBorrowed: {}",
             patron.name, patron.patron_id, patron.phone_number, borrowed)?;
    Ok(())
}

fn print_borrowed<W: Write>(library: &Library, patron_id: &str, output: &mut W) -> LibraryResult<()> {
    for book in library.borrowed_books(patron_id) {
        writeln!(output, "- {} (ISBN: {})", book.title, book.isbn)?;
    }
    Ok(())
}

fn view_books<W: Write>(library: &Library, output: &mut W) -> LibraryResult<()> {
    writeln!(output, "\nAvailable Books:")?;
    for book in library.books() {
        let status = if book.availability() { "Available" } else { "Not Available" };
        writeln!(output, "- {} (ISBN: {}) [{}]", book.title, book.isbn, status)?;
    }
    Ok(())
}

fn borrow<R: BufRead, W: Write>(library: &mut Library, patron_id: &str,
                                input: &mut R, output: &mut W) -> LibraryResult<bool> {
    let isbn = match prompt(input, output, "\nEnter book ISBN for borrowing: ")? {
        Some(isbn) => isbn,
        None => return Ok(false),
    };
    if library.find_book(isbn.as_str()).is_none() {
        writeln!(output, "Book not found.")?;
        return Ok(true);
    }
    match library.loan_book(isbn.as_str(), patron_id) {
        Ok(loan) => {
            if let Some(details) = library.loan_details(loan.loan_id.as_str()) {
                writeln!(output, "{}", details)?;
            }
            writeln!(output, "\nAfter borrowing:")?;
            print_patron(library, patron_id, output)?;
        }
        Err(LibraryError::CurrentlyUnavailable { .. }) => {
            writeln!(output, "Book is NOT available for loan.")?;
        }
        Err(err) => {
            writeln!(output, "Could not borrow book: {}", err)?;
        }
    }
    Ok(true)
}

fn give_back<R: BufRead, W: Write>(library: &mut Library, patron_id: &str,
                                   input: &mut R, output: &mut W) -> LibraryResult<bool> {
    if library.borrowed_books(patron_id).is_empty() {
        writeln!(output, "You have no borrowed books.")?;
        return Ok(true);
    }
    writeln!(output, "\nYour borrowed books:")?;
    print_borrowed(library, patron_id, output)?;
    let isbn = match prompt(input, output, "\nEnter book ISBN to return: ")? {
        Some(isbn) => isbn,
        None => return Ok(false),
    };
    let holds = library.find_patron(patron_id).map(|p| p.has_borrowed(isbn.as_str())).unwrap_or(false);
    if !holds {
        writeln!(output, "Book not found in your borrowed list.")?;
        return Ok(true);
    }
    match library.return_book(isbn.as_str(), patron_id) {
        Ok(_) => {
            writeln!(output, "\nAfter returning:")?;
            print_patron(library, patron_id, output)?;
        }
        Err(err) => {
            writeln!(output, "Could not return book: {}", err)?;
        }
    }
    Ok(true)
}

/// Runs the interactive menu for the given patron until the user picks exit or the
/// input ends.
pub fn run_menu<R: BufRead, W: Write>(library: &mut Library, patron_id: &str,
                                      input: &mut R, output: &mut W) -> LibraryResult<()> {
    loop {
        print_menu(output)?;
        let choice = match prompt(input, output, "Enter your choice (1-5): ")? {
            Some(line) => MenuChoice::from(line.as_str()),
            None => MenuChoice::Exit,
        };
        info!(choice = ?choice, "menu choice");
        let keep_going = match choice {
            MenuChoice::ViewBooks => {
                view_books(library, output)?;
                true
            }
            MenuChoice::Borrow => borrow(library, patron_id, input, output)?,
            MenuChoice::Return => give_back(library, patron_id, input, output)?,
            MenuChoice::ViewBorrowed => {
                writeln!(output, "\nCurrently borrowed books:")?;
                if library.borrowed_books(patron_id).is_empty() {
                    writeln!(output, "None")?;
                } else {
                    print_borrowed(library, patron_id, output)?;
                }
                true
            }
            MenuChoice::Exit => false,
            MenuChoice::Invalid => {
                writeln!(output, "Invalid choice. Please enter 1-5.")?;
                true
            }
        };
        if !keep_going {
            writeln!(output, "Goodbye!")?;
            return Ok(());
        }
    }
}
