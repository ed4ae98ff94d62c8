use vodca::References;

use crate::entity::{
    BookAuthor, BookDescription, BookDraft, BookGenre, BookPatch, BookPublisher, BookTitle,
    Isbn, PublicationYear,
};

/// Caller supplied data proposing a new book or changes to the one sharing its ISBN.
///
/// Optional fields keep the distinction between "not supplied" (`None`) and
/// "supplied as null" (`Some(None)`), which only matters when the candidate
/// ends up updating an existing book.
#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct BookCandidate {
    title: BookTitle,
    author: BookAuthor,
    isbn: Option<Option<Isbn>>,
    publisher: Option<Option<BookPublisher>>,
    year: Option<Option<PublicationYear>>,
    genre: Option<Option<BookGenre>>,
    description: Option<Option<BookDescription>>,
}

impl BookCandidate {
    pub fn new(
        title: BookTitle,
        author: BookAuthor,
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

    /// ISBN to match existing books against. `None` means the candidate always creates.
    pub fn lookup_key(&self) -> Option<&Isbn> {
        self.isbn.as_ref().and_then(Option::as_ref)
    }

    pub fn into_draft(self) -> BookDraft {
        BookDraft::new(
            self.title,
            self.author,
            self.isbn.flatten(),
            self.publisher.flatten(),
            self.year.flatten(),
            self.genre.flatten(),
            self.description.flatten(),
        )
    }

    pub fn into_patch(self) -> BookPatch {
        BookPatch::new(
            Some(self.title),
            Some(self.author),
            self.isbn,
            self.publisher,
            self.year,
            self.genre,
            self.description,
        )
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{BookAuthor, BookCandidate, BookGenre, BookTitle, Isbn};

    fn candidate(isbn: Option<Option<Isbn>>) -> BookCandidate {
        BookCandidate::new(
            BookTitle::new("A"),
            BookAuthor::new("X"),
            isbn,
            None,
            None,
            Some(None),
            None,
        )
    }

    #[test]
    fn lookup_key_requires_a_value() {
        assert!(candidate(None).lookup_key().is_none());
        assert!(candidate(Some(None)).lookup_key().is_none());
        assert_eq!(
            candidate(Some(Some(Isbn::new("111")))).lookup_key(),
            Some(&Isbn::new("111"))
        );
    }

    #[test]
    fn draft_stores_omitted_fields_as_absent() {
        let draft = candidate(Some(Some(Isbn::new("111")))).into_draft();
        assert_eq!(draft.isbn(), &Some(Isbn::new("111")));
        assert_eq!(draft.genre(), &None::<BookGenre>);
        assert_eq!(draft.publisher(), &None);
    }

    #[test]
    fn patch_keeps_omitted_and_null_apart() {
        let patch = candidate(None).into_patch();
        assert_eq!(patch.title(), &Some(BookTitle::new("A")));
        assert_eq!(patch.isbn(), &None);
        assert_eq!(patch.genre(), &Some(None));
    }
}
