use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookDescription, BookDraft, BookGenre, BookId, BookPublisher, BookTitle,
    CreatedAt, Isbn, PublicationYear, SelectLimit, SelectOffset, UpdatedAt,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, isbn).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &BookDraft,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: Option<String>,
    publisher: Option<String>,
    publication_year: Option<i32>,
    genre: Option<String>,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: Option<OffsetDateTime>,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            value.isbn.map(Isbn::new),
            value.publisher.map(BookPublisher::new),
            value.publication_year.map(PublicationYear::new),
            value.genre.map(BookGenre::new),
            value.description.map(BookDescription::new),
            CreatedAt::new(value.created_at),
            value.updated_at.map(UpdatedAt::new),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    pub(in crate::database) async fn create_table(
        con: &mut PgConnection,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                author VARCHAR(255) NOT NULL,
                isbn VARCHAR(50) UNIQUE,
                publisher VARCHAR(255),
                publication_year INTEGER,
                genre VARCHAR(100),
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&mut *con)
        .await
        .convert_error()?;

        // language=postgresql
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS books_title_idx ON books (title)
            "#,
        )
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    #[tracing::instrument(skip(con))]
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, publisher, publication_year, genre, description, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    #[tracing::instrument(skip(con))]
    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, publisher, publication_year, genre, description, created_at, updated_at
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    #[tracing::instrument(skip(con))]
    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, publisher, publication_year, genre, description, created_at, updated_at
            FROM books
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    #[tracing::instrument(skip(con))]
    async fn create(
        con: &mut PgConnection,
        book: &BookDraft,
    ) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (title, author, isbn, publisher, publication_year, genre, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, author, isbn, publisher, publication_year, genre, description, created_at, updated_at
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref().map(|isbn| isbn.as_ref()))
        .bind(book.publisher().as_ref().map(|publisher| publisher.as_ref()))
        .bind(book.year().as_ref().map(|year| year.as_ref()))
        .bind(book.genre().as_ref().map(|genre| genre.as_ref()))
        .bind(book.description().as_ref().map(|description| description.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Book::from(row))
    }

    #[tracing::instrument(skip(con))]
    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, publisher = $5, publication_year = $6,
                genre = $7, description = $8, updated_at = now()
            WHERE id = $1
            RETURNING id, title, author, isbn, publisher, publication_year, genre, description, created_at, updated_at
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref().map(|isbn| isbn.as_ref()))
        .bind(book.publisher().as_ref().map(|publisher| publisher.as_ref()))
        .bind(book.year().as_ref().map(|year| year.as_ref()))
        .bind(book.genre().as_ref().map(|genre| genre.as_ref()))
        .bind(book.description().as_ref().map(|description| description.as_ref()))
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::from).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", book.id().as_ref()))
        })
    }

    #[tracing::instrument(skip(con))]
    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", book_id.as_ref())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::distributions::{Alphanumeric, DistString};

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        BookAuthor, BookDraft, BookGenre, BookId, BookTitle, Isbn, PublicationYear, SelectLimit,
        SelectOffset,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::PostgresDatabase;

    fn random_isbn() -> Isbn {
        Isbn::new(Alphanumeric.sample_string(&mut rand::thread_rng(), 20))
    }

    fn draft(isbn: Option<Isbn>) -> BookDraft {
        BookDraft::new(
            BookTitle::new("test"),
            BookAuthor::new("tester"),
            isbn,
            None,
            Some(PublicationYear::new(2024)),
            Some(BookGenre::new("Fiction")),
            None,
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let isbn = random_isbn();

        let created = PostgresBookRepository
            .create(&mut connection, &draft(Some(isbn.clone())))
            .await?;
        assert_eq!(created.isbn(), &Some(isbn.clone()));
        assert!(created.updated_at().is_none());

        let found = PostgresBookRepository
            .find_by_isbn(&mut connection, &isbn)
            .await?;
        assert_eq!(found.as_ref(), Some(&created));

        let book = created
            .clone()
            .reconstruct(|b| b.title = BookTitle::new("test2"));
        let updated = PostgresBookRepository
            .update(&mut connection, &book)
            .await?;
        assert_eq!(updated.title(), &BookTitle::new("test2"));
        assert_eq!(updated.created_at(), created.created_at());
        assert!(updated.updated_at().is_some());

        PostgresBookRepository
            .delete(&mut connection, created.id())
            .await?;
        let found = PostgresBookRepository
            .find_by_id(&mut connection, created.id())
            .await?;
        assert!(found.is_none());

        connection.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn books_without_isbn_do_not_collide() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;

        let first = PostgresBookRepository
            .create(&mut connection, &draft(None))
            .await?;
        let second = PostgresBookRepository
            .create(&mut connection, &draft(None))
            .await?;
        assert!(first.id().as_ref() < second.id().as_ref());

        let page = PostgresBookRepository
            .find_all(
                &mut connection,
                &SelectLimit::new(i64::MAX),
                &SelectOffset::default(),
            )
            .await?;
        let position = |id: &BookId| page.iter().position(|b| b.id() == id);
        assert!(position(first.id()) < position(second.id()));

        connection.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_isbn_is_rejected_by_the_store() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let isbn = random_isbn();

        PostgresBookRepository
            .create(&mut connection, &draft(Some(isbn.clone())))
            .await?;
        let report = PostgresBookRepository
            .create(&mut connection, &draft(Some(isbn)))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);

        connection.roll_back().await?;
        Ok(())
    }
}
