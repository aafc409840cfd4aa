use chrono::NaiveDateTime;
use domain::{Article, ArticlePatch, ArticleStatus, DomainError, NewArticle, Page};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
}

impl From<CreateArticleRequest> for NewArticle {
    fn from(request: CreateArticleRequest) -> Self {
        NewArticle::new(
            request.title,
            request.content,
            request.category,
            request.status,
        )
    }
}

/// PATCH body. The outer `Option` records whether the key was sent at all,
/// the inner one whether it was `null`.
#[derive(Debug, Default, Deserialize)]
pub struct PatchArticleRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<ArticleStatus>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_null<T>(field: &str, value: Option<Option<T>>) -> Result<Option<T>, DomainError> {
    match value {
        None => Ok(None),
        Some(Some(value)) => Ok(Some(value)),
        Some(None) => Err(DomainError::validation(format!(
            "{} may be omitted but not null",
            field
        ))),
    }
}

impl TryFrom<PatchArticleRequest> for ArticlePatch {
    type Error = DomainError;

    fn try_from(request: PatchArticleRequest) -> Result<Self, Self::Error> {
        Ok(ArticlePatch {
            title: non_null("title", request.title)?,
            content: non_null("content", request.content)?,
            category: non_null("category", request.category)?,
            status: non_null("status", request.status)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    #[serde(default, deserialize_with = "flag")]
    pub published_only: bool,
}

// Accepts the spellings query strings commonly use for booleans
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "published_only must be a boolean, got '{}'",
            other
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            category: article.category,
            status: article.status,
            created_date: article.created_date,
            updated_date: article.updated_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub offset: i64,
    pub limit: i64,
    pub total_count: i64,
}

impl From<Page<Article>> for PagedResponse<ArticleResponse> {
    fn from(page: Page<Article>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            offset: page.offset,
            limit: page.limit,
            total_count: page.total_count,
        }
    }
}
