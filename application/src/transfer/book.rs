use error_stack::Report;
use time::OffsetDateTime;

use kernel::prelude::entity::{
    Book, BookAuthor, BookCandidate, BookDescription, BookGenre, BookPatch, BookPublisher,
    BookTitle, DestructBook, Isbn, PublicationYear, SelectLimit, SelectOffset,
};
use kernel::KernelError;

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
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
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.map(Into::into),
            publisher: publisher.map(Into::into),
            year: year.map(Into::into),
            genre: genre.map(Into::into),
            description: description.map(Into::into),
            created_at: created_at.into(),
            updated_at: updated_at.map(Into::into),
        }
    }
}

/// Optional fields use `None` for "not supplied" and `Some(None)` for an explicit null.
#[derive(Debug, Clone, Default)]
pub struct CandidateBookDto {
    pub title: String,
    pub author: String,
    pub isbn: Option<Option<String>>,
    pub publisher: Option<Option<String>>,
    pub year: Option<Option<i32>>,
    pub genre: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl TryFrom<CandidateBookDto> for BookCandidate {
    type Error = Report<KernelError>;
    fn try_from(value: CandidateBookDto) -> Result<Self, Self::Error> {
        Ok(BookCandidate::new(
            BookTitle::parse(value.title)?,
            BookAuthor::parse(value.author)?,
            nullable(value.isbn, Isbn::parse)?,
            nullable(value.publisher, |v| BookPublisher::parse(v).map(Some))?,
            value.year.map(|year| year.map(PublicationYear::new)),
            nullable(value.genre, |v| BookGenre::parse(v).map(Some))?,
            value
                .description
                .map(|description| description.map(BookDescription::new)),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct GetBookDto {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct GetAllBookDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBookDto {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<Option<String>>,
    pub publisher: Option<Option<String>>,
    pub year: Option<Option<i32>>,
    pub genre: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl TryFrom<UpdateBookDto> for BookPatch {
    type Error = Report<KernelError>;
    fn try_from(value: UpdateBookDto) -> Result<Self, Self::Error> {
        Ok(BookPatch::new(
            value.title.map(BookTitle::parse).transpose()?,
            value.author.map(BookAuthor::parse).transpose()?,
            nullable(value.isbn, Isbn::parse)?,
            nullable(value.publisher, |v| BookPublisher::parse(v).map(Some))?,
            value.year.map(|year| year.map(PublicationYear::new)),
            nullable(value.genre, |v| BookGenre::parse(v).map(Some))?,
            value
                .description
                .map(|description| description.map(BookDescription::new)),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBookDto {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct DeletedBookDto {
    pub id: i64,
    pub title: String,
}

fn nullable<T>(
    value: Option<Option<String>>,
    parse: impl FnOnce(String) -> error_stack::Result<Option<T>, KernelError>,
) -> error_stack::Result<Option<Option<T>>, KernelError> {
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(value)) => parse(value).map(Some),
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{BookCandidate, BookPatch, Isbn};
    use kernel::KernelError;

    use crate::transfer::{CandidateBookDto, UpdateBookDto};

    #[test]
    fn blank_isbn_becomes_absent() {
        let candidate = BookCandidate::try_from(CandidateBookDto {
            title: "A".to_string(),
            author: "X".to_string(),
            isbn: Some(Some("   ".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(candidate.isbn(), &Some(None));
        assert!(candidate.lookup_key().is_none());
    }

    #[test]
    fn isbn_is_trimmed() {
        let candidate = BookCandidate::try_from(CandidateBookDto {
            title: "A".to_string(),
            author: "X".to_string(),
            isbn: Some(Some(" 111 ".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(candidate.lookup_key(), Some(&Isbn::new("111")));
    }

    #[test]
    fn missing_title_is_rejected() {
        let report = BookCandidate::try_from(CandidateBookDto {
            title: "".to_string(),
            author: "X".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
    }

    #[test]
    fn update_rejects_blank_author_only_when_supplied() {
        let patch = BookPatch::try_from(UpdateBookDto {
            id: 1,
            ..Default::default()
        })
        .unwrap();
        assert!(patch.is_empty());

        let report = BookPatch::try_from(UpdateBookDto {
            id: 1,
            author: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
    }
}
