use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use thiserror::Error;

use crate::db::{Database, StoreError};
use crate::models::*;

pub const ARTICLE_ADDED: &str = "Successfully added a new article to DB!";
pub const ALL_ARTICLES_DELETED: &str = "Successfully deleted all articles data in wikiDB!";
pub const ARTICLE_NOT_FOUND: &str = "No articles matching that title was found!";
pub const ARTICLE_UPDATED: &str = "Successfully updated the article!";
pub const ARTICLE_DELETED: &str = "Successfully deleted the article!";

// ============================================================
// Error Handling
// ============================================================

/// A failed request.
///
/// Failures are reported in the response body only: the status code is 200
/// like every other response, and the body is
/// `{"error": <kind>, "message": <text>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(_) => "store_error",
            Self::InvalidBody(_) => "invalid_body",
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

/// Read a create or replace body. A request without a form content type
/// counts as an empty form; a malformed form body is still rejected.
fn form_or_empty(
    body: Result<Form<ArticleInput>, FormRejection>,
) -> Result<ArticleInput, ApiError> {
    match body {
        Ok(Form(input)) => Ok(input),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(ArticleInput::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!("Request failed ({}): {}", self.kind(), message);

        let body = serde_json::json!({
            "error": self.kind(),
            "message": message,
        });
        (StatusCode::OK, Json(body)).into_response()
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Collection
// ============================================================

pub async fn list_articles(State(db): State<Database>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(db.find_all_articles()?))
}

pub async fn create_article(
    State(db): State<Database>,
    body: Result<Form<ArticleInput>, FormRejection>,
) -> Result<&'static str, ApiError> {
    let input = form_or_empty(body)?;
    db.insert_article(input)?;
    Ok(ARTICLE_ADDED)
}

pub async fn delete_all_articles(State(db): State<Database>) -> Result<&'static str, ApiError> {
    db.delete_all_articles()?;
    Ok(ALL_ARTICLES_DELETED)
}

// ============================================================
// Single article
// ============================================================

/// A missing article is not an error: the response is the not-found text.
pub async fn get_article(
    State(db): State<Database>,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    match db.find_article(&title)? {
        Some(article) => Ok(Json(article).into_response()),
        None => Ok(ARTICLE_NOT_FOUND.into_response()),
    }
}

pub async fn replace_article(
    State(db): State<Database>,
    Path(title): Path<String>,
    body: Result<Form<ArticleInput>, FormRejection>,
) -> Result<&'static str, ApiError> {
    let input = form_or_empty(body)?;
    db.replace_article(&title, input)?;
    Ok(ARTICLE_UPDATED)
}

/// Partial update. Fields other than `title` and `content` reject the whole
/// request before the store is touched.
pub async fn update_article(
    State(db): State<Database>,
    Path(title): Path<String>,
    body: Result<Form<ArticlePatch>, FormRejection>,
) -> Result<&'static str, ApiError> {
    let Form(patch) = body?;
    db.merge_article(&title, &patch)?;
    Ok(ARTICLE_UPDATED)
}

pub async fn delete_article(
    State(db): State<Database>,
    Path(title): Path<String>,
) -> Result<&'static str, ApiError> {
    db.delete_article(&title)?;
    Ok(ARTICLE_DELETED)
}
