mod author;
mod candidate;
mod description;
mod genre;
mod id;
mod isbn;
mod patch;
mod publisher;
mod title;
mod year;

pub use self::{
    author::*, candidate::*, description::*, genre::*, id::*, isbn::*, patch::*, publisher::*,
    title::*, year::*,
};
use crate::entity::common::{CreatedAt, UpdatedAt};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    isbn: Option<Isbn>,
    publisher: Option<BookPublisher>,
    year: Option<PublicationYear>,
    genre: Option<BookGenre>,
    description: Option<BookDescription>,
    created_at: CreatedAt<Book>,
    updated_at: Option<UpdatedAt<Book>>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        isbn: Option<Isbn>,
        publisher: Option<BookPublisher>,
        year: Option<PublicationYear>,
        genre: Option<BookGenre>,
        description: Option<BookDescription>,
        created_at: CreatedAt<Book>,
        updated_at: Option<UpdatedAt<Book>>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
            publisher,
            year,
            genre,
            description,
            created_at,
            updated_at,
        }
    }
}

/// A book that has not been stored yet. The store assigns its id and creation time.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookDraft {
    title: BookTitle,
    author: BookAuthor,
    isbn: Option<Isbn>,
    publisher: Option<BookPublisher>,
    year: Option<PublicationYear>,
    genre: Option<BookGenre>,
    description: Option<BookDescription>,
}

impl BookDraft {
    pub fn new(
        title: BookTitle,
        author: BookAuthor,
        isbn: Option<Isbn>,
        publisher: Option<BookPublisher>,
        year: Option<PublicationYear>,
        genre: Option<BookGenre>,
        description: Option<BookDescription>,
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
}
