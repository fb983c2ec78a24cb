//! Comments and ratings

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        comment::{BookComment, CommentRequest},
        user::UserClaims,
        Page,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CommentsService {
    repository: Repository,
}

impl CommentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create or overwrite the caller's comment on a book
    pub async fn upsert(&self, user_id: i32, book_id: i32, request: CommentRequest) -> AppResult<BookComment> {
        request.validate()?;
        self.repository.users.ensure_active(user_id).await?;
        let text = request
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let comment = self
            .repository
            .comments
            .upsert(user_id, book_id, request.rating, text)
            .await?;
        tracing::info!(user_id, book_id, rating = comment.rating, "Comment saved");
        Ok(comment)
    }

    pub async fn delete(&self, comment_id: i32, claims: &UserClaims) -> AppResult<BookComment> {
        let comment = self.repository.comments.get_by_id(comment_id).await?;
        comment.ensure_deletable_by(claims.user_id, claims.is_admin())?;
        self.repository.comments.delete(&comment).await?;
        tracing::info!(user_id = claims.user_id, comment_id, "Comment deleted");
        Ok(comment)
    }

    pub async fn for_book(&self, book_id: i32, page: Page) -> AppResult<(Vec<BookComment>, i64)> {
        // 404 for unknown books rather than an empty page
        self.repository.books.get_by_id(book_id).await?;
        self.repository.comments.page_for_book(book_id, page).await
    }
}
