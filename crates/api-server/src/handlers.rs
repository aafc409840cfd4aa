use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{ArticlePatch, DomainError, PageRequest};
use serde_json::{json, Value};

use crate::dto::{
    ArticleResponse, CreateArticleRequest, ListArticlesQuery, PagedResponse, PatchArticleRequest,
};
use crate::error::ApiError;
use crate::AppState;

fn empty_object() -> Json<Value> {
    Json(json!({}))
}

/// Any integer is a well-formed id. One outside the stored range cannot
/// exist, so it is reported as missing rather than malformed.
fn article_id(raw: &str) -> Result<i32, ApiError> {
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::unprocessable(format!(
            "Invalid article id: '{}'",
            raw
        )));
    }

    raw.parse::<i32>().map_err(|_| {
        let out_of_range = if negative { i64::MIN } else { i64::MAX };
        DomainError::ArticleNotFound(raw.parse().unwrap_or(out_of_range)).into()
    })
}

pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    state
        .article_app
        .article_service
        .create_article(request.into())
        .await?;
    Ok(empty_object())
}

pub async fn list_articles(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<Json<PagedResponse<ArticleResponse>>, ApiError> {
    let Path((limit, offset)) = path?;
    let Query(query) = query?;

    let page = state
        .article_app
        .article_service
        .list_articles(PageRequest::new(limit, offset, query.published_only))
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id = article_id(&id?.0)?;
    let article = state.article_app.article_service.get_article(id).await?;
    Ok(Json(article.into()))
}

pub async fn patch_article(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<PatchArticleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = article_id(&id?.0)?;
    let Json(request) = payload?;
    let patch = ArticlePatch::try_from(request)?;

    state
        .article_app
        .article_service
        .update_article(id, patch)
        .await?;
    Ok(empty_object())
}

pub async fn delete_article(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = article_id(&id?.0)?;
    state.article_app.article_service.delete_article(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
