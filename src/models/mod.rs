//! Domain models for the wiki.
//!
//! - [`Article`]: a document in the article collection, addressed by title.
//! - [`ArticleInput`]: body of create and full-replace requests.
//! - [`ArticlePatch`]: body of partial updates, restricted to [`ArticleField`]s.

mod article;

pub use article::*;
