use crate::controller::Intake;
use application::transfer::{
    CandidateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, UpdateBookDto,
};
use kernel::prelude::entity::{SelectLimit, SelectOffset};
use serde::{Deserialize, Deserializer};

/// Body of both the reconciling and the strict create endpoints.
#[derive(Debug, Deserialize)]
pub struct UpsertBookRequest {
    title: String,
    author: String,
    #[serde(default, deserialize_with = "nullable")]
    isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    author: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
}

/// A present key always yields `Some`, so an explicit `null` survives as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// I want to use primitive type(i64) in these fields, but default attribute not supported for literals(https://github.com/serde-rs/serde/issues/368)
#[derive(Debug, Deserialize)]
pub struct GetAllBookRequest {
    #[serde(default)]
    skip: SelectOffset,
    #[serde(default)]
    limit: SelectLimit,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: i64,
}

impl GetBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i64,
}

impl DeleteBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<UpsertBookRequest> for BookTransformer {
    type To = CandidateBookDto;
    fn emit(&self, input: UpsertBookRequest) -> Self::To {
        CandidateBookDto {
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            publisher: input.publisher,
            year: input.year,
            genre: input.genre,
            description: input.description,
        }
    }
}

impl Intake<(i64, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (i64, UpdateBookRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            publisher: input.publisher,
            year: input.year,
            genre: input.genre,
            description: input.description,
        }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetAllBookRequest> for BookTransformer {
    type To = GetAllBookDto;
    fn emit(&self, input: GetAllBookRequest) -> Self::To {
        GetAllBookDto {
            limit: input.limit,
            offset: input.skip,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

#[cfg(test)]
mod test {
    use super::{BookTransformer, UpdateBookRequest, UpsertBookRequest};
    use crate::controller::Intake;

    #[test]
    fn absent_and_null_stay_distinct() {
        let request: UpsertBookRequest = serde_json::from_str(
            r#"{"title": "A", "author": "X", "isbn": "111", "genre": null}"#,
        )
        .unwrap();
        let dto = BookTransformer.emit(request);
        assert_eq!(dto.isbn, Some(Some("111".to_string())));
        assert_eq!(dto.genre, Some(None));
        assert_eq!(dto.publisher, None);
        assert_eq!(dto.year, None);
    }

    #[test]
    fn title_and_author_are_required() {
        assert!(serde_json::from_str::<UpsertBookRequest>(r#"{"title": "A"}"#).is_err());
        assert!(
            serde_json::from_str::<UpsertBookRequest>(r#"{"title": "A", "author": "X", "year": "1999"}"#)
                .is_err()
        );
    }

    #[test]
    fn update_accepts_any_subset() {
        let request: UpdateBookRequest = serde_json::from_str(r#"{"year": 2001}"#).unwrap();
        let dto = BookTransformer.emit((7, request));
        assert_eq!(dto.id, 7);
        assert_eq!(dto.title, None);
        assert_eq!(dto.year, Some(Some(2001)));
    }
}
