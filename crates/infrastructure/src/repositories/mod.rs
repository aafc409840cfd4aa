pub mod sqlite_article_repository;

pub use sqlite_article_repository::SqliteArticleRepository;
