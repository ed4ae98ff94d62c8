use destructure::Destructure;
use vodca::References;

use crate::entity::{
    Book, BookAuthor, BookDescription, BookGenre, BookPublisher, BookTitle, Isbn,
    PublicationYear,
};
use crate::modify::Applier;

/// Sparse set of field changes.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears the
/// stored value and `Some(Some(v))` overwrites it.
#[derive(Debug, Clone, Default, Eq, PartialEq, References, Destructure)]
pub struct BookPatch {
    title: Option<BookTitle>,
    author: Option<BookAuthor>,
    isbn: Option<Option<Isbn>>,
    publisher: Option<Option<BookPublisher>>,
    year: Option<Option<PublicationYear>>,
    genre: Option<Option<BookGenre>>,
    description: Option<Option<BookDescription>>,
}

impl BookPatch {
    pub fn new(
        title: Option<BookTitle>,
        author: Option<BookAuthor>,
        isbn: Option<Option<Isbn>>,
        publisher: Option<Option<BookPublisher>>,
        year: Option<Option<PublicationYear>>,
        genre: Option<Option<BookGenre>>,
        description: Option<Option<BookDescription>>,
    ) -> Self {
        Self {
            title,
            author,
            isbn,
            publisher,
            year,
            genre,
            description,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.publisher.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.description.is_none()
    }
}

impl Applier<BookPatch> for Book {
    fn apply(&mut self, patch: BookPatch) {
        let DestructBookPatch {
            title,
            author,
            isbn,
            publisher,
            year,
            genre,
            description,
        } = patch.into_destruct();
        self.substitute(|book| {
            if let Some(title) = title {
                *book.title = title;
            }
            if let Some(author) = author {
                *book.author = author;
            }
            if let Some(isbn) = isbn {
                *book.isbn = isbn;
            }
            if let Some(publisher) = publisher {
                *book.publisher = publisher;
            }
            if let Some(year) = year {
                *book.year = year;
            }
            if let Some(genre) = genre {
                *book.genre = genre;
            }
            if let Some(description) = description {
                *book.description = description;
            }
        })
    }
}
