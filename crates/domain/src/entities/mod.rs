pub mod article;
pub mod page;

pub use article::*;
pub use page::*;
