use crate::entities::{Article, ArticlePatch, NewArticle, Page, PageRequest};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Persistence port for articles.
///
/// Every lookup is scoped to records whose status is not `trash`; a trashed
/// article behaves exactly like a missing one. Methods that target a single
/// id return `None` / `false` instead of an error when nothing matched so the
/// service decides how to surface it.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Persists a new article and returns its assigned id.
    async fn insert(&self, article: &NewArticle) -> Result<i32, DomainError>;

    async fn find_visible(&self, id: i32) -> Result<Option<Article>, DomainError>;

    /// Ordered by `updated_date` descending, ties broken by `id` descending.
    /// `total_count` must use the same filter as the page.
    async fn list_visible(&self, request: &PageRequest) -> Result<Page<Article>, DomainError>;

    /// Applies the present fields and refreshes `updated_date`.
    /// Returns `false` when no visible article has this id.
    async fn apply_patch(&self, id: i32, patch: &ArticlePatch) -> Result<bool, DomainError>;

    /// Sets status to `trash` and refreshes `updated_date`.
    /// Returns `false` when no visible article has this id.
    async fn trash(&self, id: i32) -> Result<bool, DomainError>;
}
