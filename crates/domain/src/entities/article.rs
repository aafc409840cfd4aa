use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

pub const TITLE_MIN_CHARS: usize = 20;
pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MIN_CHARS: usize = 200;
pub const CATEGORY_MIN_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Publish,
    Draft,
    Trash,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Publish => "publish",
            ArticleStatus::Draft => "draft",
            ArticleStatus::Trash => "trash",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(ArticleStatus::Publish),
            "draft" => Ok(ArticleStatus::Draft),
            "trash" => Ok(ArticleStatus::Trash),
            other => Err(DomainError::validation(format!(
                "Unknown article status: {}",
                other
            ))),
        }
    }
}

/// A persisted article. Only the store hands these out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

/// Fields supplied by the caller when creating an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
}

impl NewArticle {
    pub fn new(title: String, content: String, category: String, status: ArticleStatus) -> Self {
        Self {
            title,
            content,
            category,
            status,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_category(&self.category)?;
        Ok(())
    }
}

/// Partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
}

impl ArticlePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    let len = title.chars().count();
    if len < TITLE_MIN_CHARS || len > TITLE_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "title must be between {} and {} characters, got {}",
            TITLE_MIN_CHARS, TITLE_MAX_CHARS, len
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    let len = content.chars().count();
    if len < CONTENT_MIN_CHARS {
        return Err(DomainError::validation(format!(
            "content must be at least {} characters, got {}",
            CONTENT_MIN_CHARS, len
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), DomainError> {
    let len = category.chars().count();
    if len < CATEGORY_MIN_CHARS {
        return Err(DomainError::validation(format!(
            "category must be at least {} characters, got {}",
            CATEGORY_MIN_CHARS, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_article() -> NewArticle {
        NewArticle::new(
            "A title that is long enough".to_string(),
            "x".repeat(CONTENT_MIN_CHARS),
            "rust".to_string(),
            ArticleStatus::Draft,
        )
    }

    #[test]
    fn status_literals_match_wire_format() {
        for status in [ArticleStatus::Publish, ArticleStatus::Draft, ArticleStatus::Trash] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<ArticleStatus>().unwrap(), status);
        }
        assert!("Publish".parse::<ArticleStatus>().is_err());
        assert!(serde_json::from_str::<ArticleStatus>("\"archived\"").is_err());
    }

    #[test]
    fn accepts_boundary_lengths() {
        let mut article = valid_article();
        article.title = "t".repeat(TITLE_MIN_CHARS);
        assert!(article.validate().is_ok());
        article.title = "t".repeat(TITLE_MAX_CHARS);
        assert!(article.validate().is_ok());
        article.category = "abc".to_string();
        assert!(article.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut article = valid_article();
        article.title = "t".repeat(TITLE_MIN_CHARS - 1);
        assert!(matches!(article.validate(), Err(DomainError::ValidationError(_))));

        let mut article = valid_article();
        article.title = "t".repeat(TITLE_MAX_CHARS + 1);
        assert!(article.validate().is_err());

        let mut article = valid_article();
        article.content = "c".repeat(CONTENT_MIN_CHARS - 1);
        assert!(article.validate().is_err());

        let mut article = valid_article();
        article.category = "ab".to_string();
        assert!(article.validate().is_err());
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut article = valid_article();
        // 20 characters, 40 bytes
        article.title = "é".repeat(TITLE_MIN_CHARS);
        assert!(article.validate().is_ok());
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = ArticlePatch {
            category: Some("new-cat".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());

        let patch = ArticlePatch {
            title: Some("short".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        assert!(ArticlePatch::default().is_empty());
        assert!(ArticlePatch::default().validate().is_ok());
    }
}
