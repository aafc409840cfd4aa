use crate::entities::{Article, ArticlePatch, NewArticle, Page, PageRequest};
use crate::errors::DomainError;
use crate::repositories::ArticleRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Article Service - validation and not-found handling in front of the store
pub struct ArticleService {
    article_repository: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(article_repository: Arc<dyn ArticleRepository>) -> Self {
        Self { article_repository }
    }

    /// Create a new article, returns the assigned id
    pub async fn create_article(&self, article: NewArticle) -> Result<i32, DomainError> {
        article.validate()?;

        let id = self.article_repository.insert(&article).await?;
        info!(id, status = %article.status, "created article");
        Ok(id)
    }

    /// Get a visible (non-trashed) article by id
    pub async fn get_article(&self, id: i32) -> Result<Article, DomainError> {
        match self.article_repository.find_visible(id).await? {
            Some(article) => Ok(article),
            None => Err(DomainError::ArticleNotFound(id.into())),
        }
    }

    pub async fn list_articles(&self, request: PageRequest) -> Result<Page<Article>, DomainError> {
        request.validate()?;

        let page = self.article_repository.list_visible(&request).await?;
        debug!(
            limit = request.limit,
            offset = request.offset,
            published_only = request.published_only,
            returned = page.items.len(),
            total_count = page.total_count,
            "listed articles"
        );
        Ok(page)
    }

    /// Apply a partial update. Present fields are re-validated here so the
    /// store never sees an out-of-range value.
    pub async fn update_article(&self, id: i32, patch: ArticlePatch) -> Result<(), DomainError> {
        patch.validate()?;

        if !self.article_repository.apply_patch(id, &patch).await? {
            return Err(DomainError::ArticleNotFound(id.into()));
        }
        info!(id, "updated article");
        Ok(())
    }

    /// Soft delete: the article moves to `trash` and disappears from every read
    pub async fn delete_article(&self, id: i32) -> Result<(), DomainError> {
        if !self.article_repository.trash(id).await? {
            return Err(DomainError::ArticleNotFound(id.into()));
        }
        info!(id, "moved article to trash");
        Ok(())
    }
}
