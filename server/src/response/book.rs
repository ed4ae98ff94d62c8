use crate::controller::Exhaust;
use application::transfer::{BookDto, DeletedBookDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: i64,
    title: String,
    author: String,
    isbn: Option<String>,
    publisher: Option<String>,
    year: Option<i32>,
    genre: Option<String>,
    description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    updated_at: Option<OffsetDateTime>,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author: value.author,
            isbn: value.isbn,
            publisher: value.publisher,
            year: value.year,
            genre: value.genre,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedBookResponse {
    message: String,
}

impl IntoResponse for DeletedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = axum::Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(BookResponse::from)
            .collect::<Vec<_>>();

        axum::Json::from(result)
    }
}

impl Exhaust<DeletedBookDto> for BookPresenter {
    type To = DeletedBookResponse;
    fn emit(&self, input: DeletedBookDto) -> Self::To {
        DeletedBookResponse {
            message: format!("Book '{}' deleted", input.title),
        }
    }
}
