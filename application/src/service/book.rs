use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{Applier, BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookCandidate, BookId, BookPatch};
use kernel::KernelError;

use crate::transfer::{
    BookDto, CandidateBookDto, DeleteBookDto, DeletedBookDto, GetAllBookDto, GetBookDto,
    UpdateBookDto,
};

/// The first lookup plus one retry on a fresh session.
const ISBN_LOOKUP_ATTEMPTS: u32 = 2;

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    #[tracing::instrument(skip(self))]
    async fn get_book(&self, dto: &GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let found = match self.book_query().find_by_id(&mut connection, &id).await {
            Ok(Some(book)) => Ok(book),
            Ok(None) => Err(not_found(&id)),
            Err(report) => Err(report),
        };

        settle(connection, found).await.map(BookDto::from)
    }

    #[tracing::instrument(skip(self))]
    async fn get_all_books(
        &self,
        dto: &GetAllBookDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        if *dto.limit.as_ref() < 0 || *dto.offset.as_ref() < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("skip and limit must not be negative"));
        }
        let mut connection = self.database_connection().transact().await?;

        let found = self
            .book_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await;

        let books = settle(connection, found).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait ReconcileBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    /// Creates the book, or updates the one already holding the candidate's ISBN.
    ///
    /// A failed ISBN lookup is retried once on a brand new session. Failures while
    /// writing are not retried.
    #[tracing::instrument(skip(self))]
    async fn reconcile_book(
        &self,
        dto: CandidateBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let candidate = BookCandidate::try_from(dto)?;
        let mut connection = self.database_connection().transact().await?;

        let existing = match candidate.lookup_key() {
            None => None,
            Some(isbn) => {
                let mut attempt = 1;
                loop {
                    match self.book_query().find_by_isbn(&mut connection, isbn).await {
                        Ok(found) => break found,
                        Err(report) if attempt < ISBN_LOOKUP_ATTEMPTS => {
                            tracing::warn!(
                                attempt,
                                %isbn,
                                error = ?report,
                                "ISBN lookup failed, retrying on a fresh session"
                            );
                            discard(connection).await;
                            connection = self.database_connection().transact().await?;
                            attempt += 1;
                        }
                        Err(report) => {
                            discard(connection).await;
                            return Err(report.attach_printable(format!(
                                "ISBN lookup failed after {attempt} attempts"
                            )));
                        }
                    }
                }
            }
        };

        let written = match existing {
            Some(mut book) => {
                tracing::debug!(id = book.id().as_ref(), "ISBN matched, updating book");
                book.apply(candidate.into_patch());
                self.book_modifier().update(&mut connection, &book).await
            }
            None => {
                self.book_modifier()
                    .create(&mut connection, &candidate.into_draft())
                    .await
            }
        };

        settle(connection, written).await.map(BookDto::from)
    }

    /// Creates the book, refusing to touch an existing one with the same ISBN.
    #[tracing::instrument(skip(self))]
    async fn create_book_strict(
        &self,
        dto: CandidateBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let candidate = BookCandidate::try_from(dto)?;
        let mut connection = self.database_connection().transact().await?;

        if let Some(isbn) = candidate.lookup_key() {
            match self.book_query().find_by_isbn(&mut connection, isbn).await {
                Ok(None) => {}
                Ok(Some(_)) => {
                    discard(connection).await;
                    return Err(Report::new(KernelError::DuplicateKey)
                        .attach_printable(format!("A book with ISBN {isbn} already exists")));
                }
                Err(report) => {
                    discard(connection).await;
                    return Err(report);
                }
            }
        }

        let created = self
            .book_modifier()
            .create(&mut connection, &candidate.into_draft())
            .await;

        settle(connection, created).await.map(BookDto::from)
    }
}

impl<T> ReconcileBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    #[tracing::instrument(skip(self))]
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let patch = BookPatch::try_from(dto)?;
        let mut connection = self.database_connection().transact().await?;

        let updated = match self.book_query().find_by_id(&mut connection, &id).await {
            Ok(Some(book)) if patch.is_empty() => Ok(book),
            Ok(Some(mut book)) => {
                book.apply(patch);
                self.book_modifier().update(&mut connection, &book).await
            }
            Ok(None) => Err(not_found(&id)),
            Err(report) => Err(report),
        };

        settle(connection, updated).await.map(BookDto::from)
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    #[tracing::instrument(skip(self))]
    async fn delete_book(
        &self,
        dto: &DeleteBookDto,
    ) -> error_stack::Result<DeletedBookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let deleted = match self.book_query().find_by_id(&mut connection, &id).await {
            Ok(Some(book)) => self
                .book_modifier()
                .delete(&mut connection, &id)
                .await
                .map(|_| book),
            Ok(None) => Err(not_found(&id)),
            Err(report) => Err(report),
        };

        let book = settle(connection, deleted).await?;
        Ok(DeletedBookDto {
            id: dto.id,
            title: book.title().clone().into(),
        })
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

fn not_found(id: &BookId) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("Book {} not found", id.as_ref()))
}

/// Commits on success. On failure the transaction is rolled back before the
/// original error is handed back.
async fn settle<C: Transaction, T: Send>(
    connection: C,
    result: error_stack::Result<T, KernelError>,
) -> error_stack::Result<T, KernelError> {
    match result {
        Ok(value) => {
            connection.commit().await?;
            Ok(value)
        }
        Err(report) => {
            discard(connection).await;
            Err(report)
        }
    }
}

async fn discard<C: Transaction>(connection: C) {
    if let Err(report) = connection.roll_back().await {
        tracing::warn!(error = ?report, "Failed to roll back transaction");
    }
}
