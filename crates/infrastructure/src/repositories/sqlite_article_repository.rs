use crate::database::{posts, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;
use domain::{
    Article, ArticlePatch, ArticleRepository, ArticleStatus, DomainError, NewArticle, Page,
    PageRequest,
};

define_sql_function!(fn last_insert_rowid() -> diesel::sql_types::Integer);

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ArticleModel {
    id: i32,
    title: String,
    content: String,
    category: String,
    created_date: NaiveDateTime,
    updated_date: NaiveDateTime,
    status: String,
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
struct NewArticleModel {
    title: String,
    content: String,
    category: String,
    created_date: NaiveDateTime,
    updated_date: NaiveDateTime,
    status: String,
}

// `None` fields are skipped by diesel, which is what gives PATCH semantics
#[derive(AsChangeset)]
#[diesel(table_name = posts)]
struct ArticleChangeset {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    status: Option<String>,
}

impl TryFrom<ArticleModel> for Article {
    type Error = DomainError;

    fn try_from(model: ArticleModel) -> Result<Self, Self::Error> {
        let status = model.status.parse::<ArticleStatus>().map_err(|_| {
            DomainError::RepositoryError(format!(
                "Article {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Article {
            id: model.id,
            title: model.title,
            content: model.content,
            category: model.category,
            status,
            created_date: model.created_date,
            updated_date: model.updated_date,
        })
    }
}

impl NewArticleModel {
    fn new(article: &NewArticle, now: NaiveDateTime) -> Self {
        NewArticleModel {
            title: article.title.clone(),
            content: article.content.clone(),
            category: article.category.clone(),
            created_date: now,
            updated_date: now,
            status: article.status.as_str().to_string(),
        }
    }
}

impl From<&ArticlePatch> for ArticleChangeset {
    fn from(patch: &ArticlePatch) -> Self {
        ArticleChangeset {
            title: patch.title.clone(),
            content: patch.content.clone(),
            category: patch.category.clone(),
            status: patch.status.map(|s| s.as_str().to_string()),
        }
    }
}

type PostsFilter = Box<dyn BoxableExpression<posts::table, Sqlite, SqlType = Bool>>;

/// The one filter shared by the count and the page query.
fn visible_filter(published_only: bool) -> PostsFilter {
    let not_trashed = posts::status.ne(ArticleStatus::Trash.as_str());
    if published_only {
        Box::new(not_trashed.and(posts::status.eq(ArticleStatus::Publish.as_str())))
    } else {
        Box::new(not_trashed)
    }
}

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs `f` on a pooled connection off the async runtime. The connection
    /// goes back to the pool when the closure returns, on success or error.
    async fn run<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DomainError::RepositoryError(e.to_string()))?;
            f(&mut conn).map_err(|e| DomainError::RepositoryError(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn insert(&self, article: &NewArticle) -> Result<i32, DomainError> {
        let new_article = NewArticleModel::new(article, now());

        self.run(move |conn| {
            conn.transaction(|conn| {
                diesel::insert_into(posts::table)
                    .values(&new_article)
                    .execute(conn)?;

                diesel::select(last_insert_rowid()).get_result::<i32>(conn)
            })
        })
        .await
    }

    async fn find_visible(&self, id: i32) -> Result<Option<Article>, DomainError> {
        let result = self
            .run(move |conn| {
                posts::table
                    .filter(posts::id.eq(id))
                    .filter(visible_filter(false))
                    .select(ArticleModel::as_select())
                    .first::<ArticleModel>(conn)
                    .optional()
            })
            .await?;

        result.map(Article::try_from).transpose()
    }

    async fn list_visible(&self, request: &PageRequest) -> Result<Page<Article>, DomainError> {
        let PageRequest {
            limit,
            offset,
            published_only,
        } = *request;

        let (total_count, models) = self
            .run(move |conn| {
                conn.transaction(|conn| {
                    let total_count = posts::table
                        .filter(visible_filter(published_only))
                        .count()
                        .get_result::<i64>(conn)?;

                    let models = posts::table
                        .filter(visible_filter(published_only))
                        .order((posts::updated_date.desc(), posts::id.desc()))
                        .limit(limit)
                        .offset(offset)
                        .select(ArticleModel::as_select())
                        .load::<ArticleModel>(conn)?;

                    Ok((total_count, models))
                })
            })
            .await?;

        let items = models
            .into_iter()
            .map(Article::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, request, total_count))
    }

    async fn apply_patch(&self, id: i32, patch: &ArticlePatch) -> Result<bool, DomainError> {
        let changeset = ArticleChangeset::from(patch);
        let updated_at = now();

        let affected = self
            .run(move |conn| {
                diesel::update(
                    posts::table
                        .filter(posts::id.eq(id))
                        .filter(visible_filter(false)),
                )
                .set((&changeset, posts::updated_date.eq(updated_at)))
                .execute(conn)
            })
            .await?;

        Ok(affected > 0)
    }

    async fn trash(&self, id: i32) -> Result<bool, DomainError> {
        let updated_at = now();

        let affected = self
            .run(move |conn| {
                diesel::update(
                    posts::table
                        .filter(posts::id.eq(id))
                        .filter(visible_filter(false)),
                )
                .set((
                    posts::status.eq(ArticleStatus::Trash.as_str()),
                    posts::updated_date.eq(updated_at),
                ))
                .execute(conn)
            })
            .await?;

        Ok(affected > 0)
    }
}
