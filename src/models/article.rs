use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wiki article, the only document kind in the collection.
///
/// `title` is how clients address an article, but nothing guarantees it is
/// unique. Fields that were never supplied are absent rather than empty, so
/// both are optional and left out of the serialized document when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier assigned by the store on insert.
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A named, writable field of an [`Article`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArticleField {
    Title,
    Content,
}

impl ArticleField {
    pub const ALL: [ArticleField; 2] = [Self::Title, Self::Content];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

/// Body of a create or full-replace request.
///
/// Both fields are written as given: a missing field is stored as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Body of a partial update. Only fields present in the request are changed.
///
/// Unknown field names are rejected at deserialization time instead of being
/// merged into the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ArticlePatch {
    /// The fields this patch sets, paired with their new values, in column order.
    pub fn changes(&self) -> Vec<(ArticleField, &str)> {
        ArticleField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
            .collect()
    }

    pub fn get(&self, field: ArticleField) -> Option<&str> {
        match field {
            ArticleField::Title => self.title.as_deref(),
            ArticleField::Content => self.content.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
