//! Catalog service: book search, categories and admin book mutations

use validator::Validate;

use super::storage::{CoverStorage, UploadedFile};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookForm, BookQuery, BookSort},
        category::{BookCategory, CreateCategory},
        Page,
    },
    repository::{books::BookFilter, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    storage: CoverStorage,
}

impl CatalogService {
    pub fn new(repository: Repository, storage: CoverStorage) -> Self {
        Self { repository, storage }
    }

    /// Search books with pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64, Page)> {
        let page = Page::new(query.page, query.per_page);
        let filter = BookFilter {
            keyword: query.keyword.as_deref(),
            category_id: query.category_id,
            sort: BookSort::from_param(query.sort_by.as_deref()),
        };
        let (books, total) = self.repository.books.search(&filter, page).await?;
        Ok((books, total, page))
    }

    /// Book with its approved comments
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let comments = self.repository.comments.approved_for_book(id).await?;
        Ok(BookDetails { book, comments })
    }

    pub async fn popular(&self, limit: i64) -> AppResult<Vec<Book>> {
        self.repository.books.top(BookSort::BorrowedCount, limit).await
    }

    pub async fn top_rated(&self, limit: i64) -> AppResult<Vec<Book>> {
        self.repository.books.top(BookSort::AvgRating, limit).await
    }

    pub async fn categories(&self) -> AppResult<Vec<BookCategory>> {
        self.repository.categories.list().await
    }

    pub async fn create_category(&self, request: CreateCategory) -> AppResult<BookCategory> {
        let request = request.normalized();
        request.validate()?;

        if self.repository.categories.name_exists(&request.name).await? {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }
        self.repository.categories.create(&request).await
    }

    async fn ensure_category(&self, category_id: Option<i32>) -> AppResult<()> {
        if let Some(id) = category_id {
            if !self.repository.categories.exists(id).await? {
                return Err(AppError::Validation(format!("Category {} does not exist", id)));
            }
        }
        Ok(())
    }

    /// Create a book, storing its cover first when one is given
    pub async fn create_book(&self, form: BookForm, cover: Option<UploadedFile>) -> AppResult<Book> {
        let mut book = form.into_new_book()?;

        if self.repository.books.isbn_taken(&book.isbn, None).await? {
            return Err(AppError::Conflict("ISBN already exists".to_string()));
        }
        self.ensure_category(book.category_id).await?;

        if let Some(ref file) = cover {
            book.cover_url = Some(self.storage.save(file).await?);
        }

        match self.repository.books.create(&book).await {
            Ok(created) => {
                tracing::info!(book_id = created.id, isbn = %created.isbn, "Book created");
                Ok(created)
            }
            Err(e) => {
                if let Some(ref url) = book.cover_url {
                    self.storage.delete(url).await;
                }
                Err(e)
            }
        }
    }

    /// Update a book. A new cover replaces the old file once the row is saved.
    pub async fn update_book(&self, id: i32, form: BookForm, cover: Option<UploadedFile>) -> AppResult<Book> {
        let current = self.repository.books.get_by_id(id).await?;
        let mut changes = form.into_changes()?;
        changes.check_against(&current)?;

        if let Some(ref isbn) = changes.isbn {
            if self.repository.books.isbn_taken(isbn, Some(id)).await? {
                return Err(AppError::Conflict("ISBN already exists".to_string()));
            }
        }
        self.ensure_category(changes.category_id).await?;

        if let Some(ref file) = cover {
            changes.cover_url = Some(self.storage.save(file).await?);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = match self.repository.books.update(id, &changes).await {
            Ok(book) => book,
            Err(e) => {
                if let Some(ref url) = changes.cover_url {
                    self.storage.delete(url).await;
                }
                return Err(e);
            }
        };

        if changes.cover_url.is_some() {
            if let Some(ref old) = current.cover_url {
                self.storage.delete(old).await;
            }
        }

        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }

    /// Delete a book without active loans, then its cover file
    pub async fn delete_book(&self, id: i32) -> AppResult<Book> {
        let deleted = self.repository.books.delete(id).await?;
        if let Some(ref url) = deleted.cover_url {
            self.storage.delete(url).await;
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(deleted)
    }
}
