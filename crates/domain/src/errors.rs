use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Article not found with id: {0}")]
    ArticleNotFound(i64),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::ValidationError(message.into())
    }
}
