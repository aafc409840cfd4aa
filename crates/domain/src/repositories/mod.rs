pub mod article_repository;

pub use article_repository::ArticleRepository;
