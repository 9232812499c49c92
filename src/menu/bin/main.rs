include!("../../lib.rs");
use std::io;
use tracing::{info, warn};
use crate::auth::domain::Login;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::crawler::factory::create_scraper;
use crate::lending::domain::Library;
use crate::menu::controller::run_menu;
use crate::patrons::domain::Patron;
use crate::utils::logs::setup_tracing;

const LIBRARY_NAME: &str = "The Book Portal";

#[tokio::main]
async fn main() -> LibraryResult<()> {
    setup_tracing(std::env::var("PORTAL_LOG_JSON").is_ok());
    let config = Configuration::from_env(LIBRARY_NAME);
    info!(config = %serde_json::to_string(&config)?, "configuration loaded");

    let mut scraper = create_scraper(&config.scraper)?;
    let books = scraper.fetch_books().await;

    let mut library = Library::new(&config);
    for book in books.iter() {
        if let Err(err) = library.add_book(book.clone()) {
            warn!(isbn = book.isbn.as_str(), error = %err, "skipping scraped book");
        }
    }

    let patron = Patron::new("P001", "Mahmut", "544-9999", "pswrd12345");
    let patron_id = patron.patron_id.to_string();
    library.add_patron(patron)?;

    let mut login = Login::new();
    login.login(library.catalog(), patron_id.as_str(), "pswrd12345");
    println!("{}", login.status(library.catalog()));

    if books.is_empty() {
        println!("No books were fetched");
    } else if let Some(session_id) = login.current_patron_id() {
        println!("\nFetched Books:\n");
        print!("{}", scraper);
        println!("{}", "*".repeat(50));

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        run_menu(&mut library, session_id, &mut input, &mut output)?;
        login.logout();
    } else {
        println!("Login failed, the menu is not available");
    }

    info!(loans = library.loans().len(), "exiting");
    println!("\nLibrary status:");
    println!("{}", library);
    if !library.loans().is_empty() {
        println!("\nActive loans:");
        println!("{}", library.loans_report()?);
    }
    Ok(())
}
