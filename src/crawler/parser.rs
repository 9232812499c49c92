use scraper::{ElementRef, Html, Selector};
use crate::books::domain::Book;
use crate::core::library::{LibraryError, LibraryResult};
use crate::crawler::domain::model::BookElement;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_YEAR: &str = "Unknown Year";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

const GENRE_LABEL_TITLE: &str = "What are the genres of this book?";

fn selector(css: &str) -> LibraryResult<Selector> {
    Selector::parse(css).map_err(|err| LibraryError::serialization(
        format!("invalid selector {}: {:?}", css, err).as_str()))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Finds the book cover markers of a listing page, keeping at most `max_items` of them in
/// document order. Each candidate carries the href of its first link, if any.
pub fn parse_listing(html: &str, max_items: usize) -> LibraryResult<Vec<BookElement>> {
    let cover = selector("span.bookcover")?;
    let link = selector("a[href]")?;
    let document = Html::parse_document(html);
    Ok(document.select(&cover)
        .take(max_items)
        .enumerate()
        .map(|(position, element)| BookElement {
            position,
            href: element.select(&link).next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        })
        .collect())
}

/// Extracts a book from a detail page. Missing title, author, year or genre markup falls
/// back to the sentinel strings; a page without a usable ISBN yields `None`.
pub fn parse_book_page(html: &str) -> LibraryResult<Option<Book>> {
    let document = Html::parse_document(html);
    let isbn = match extract_isbn(&document)? {
        Some(isbn) => isbn,
        None => return Ok(None),
    };
    let title = first_text(&document, "h1[itemprop=\"name\"]")?.unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let author = first_text(&document, "a[itemprop=\"author\"]")?.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let year = first_text(&document, "span[itemprop=\"datePublished\"]")?.unwrap_or_else(|| UNKNOWN_YEAR.to_string());
    let genre = extract_genre(&document)?.unwrap_or_else(|| UNKNOWN_GENRE.to_string());
    Ok(Some(Book::new(isbn.as_str(), title.as_str(), author.as_str(), genre.as_str(), year.as_str())))
}

fn first_text(document: &Html, css: &str) -> LibraryResult<Option<String>> {
    let sel = selector(css)?;
    Ok(document.select(&sel).next().map(text_of))
}

// first whitespace separated token of the isbn node, commas stripped
fn extract_isbn(document: &Html) -> LibraryResult<Option<String>> {
    let text = match first_text(document, "dd[itemprop=\"isbn\"]")? {
        Some(text) => text,
        None => return Ok(None),
    };
    Ok(text.split_whitespace().next()
        .map(|token| token.replace(',', ""))
        .filter(|isbn| !isbn.is_empty()))
}

// label span -> enclosing category span -> value span
fn extract_genre(document: &Html) -> LibraryResult<Option<String>> {
    let label = selector(format!("span.reviews__label[title=\"{}\"]", GENRE_LABEL_TITLE).as_str())?;
    let value = selector("span.reviews__value")?;
    Ok(document.select(&label).next()
        .and_then(|label| label.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "span"
                && el.value().classes().any(|class| class == "review__category")))
        .and_then(|category| category.select(&value).next())
        .map(text_of)
        .filter(|genre| !genre.is_empty()))
}
