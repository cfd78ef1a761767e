use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrofierros_core::{ArticleId, DomainError, DomainResult, Entity};

/// A news post on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    id: ArticleId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published: bool,
}

impl NewsArticle {
    /// New unpublished draft.
    pub fn draft(
        id: ArticleId,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        let content = content.into();
        let excerpt = excerpt_of(&content);
        Ok(Self {
            id,
            title,
            content,
            excerpt,
            cover_image: None,
            author: author.into(),
            tags: Vec::new(),
            created_at: at,
            updated_at: at,
            published: false,
        })
    }

    pub fn publish(&mut self, at: DateTime<Utc>) {
        self.published = true;
        self.updated_at = at;
    }

    pub fn unpublish(&mut self, at: DateTime<Utc>) {
        self.published = false;
        self.updated_at = at;
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for NewsArticle {
    type Id = ArticleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

const EXCERPT_CHARS: usize = 160;

/// First paragraph, cut at a word boundary.
fn excerpt_of(content: &str) -> String {
    let first = content.trim().lines().next().unwrap_or_default();
    if first.chars().count() <= EXCERPT_CHARS {
        return first.to_string();
    }
    let cut: String = first.chars().take(EXCERPT_CHARS).collect();
    let trimmed = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{trimmed}…")
}

/// Published articles, newest first.
pub fn published_newest_first(articles: &[NewsArticle]) -> Vec<&NewsArticle> {
    let mut out: Vec<&NewsArticle> = articles.iter().filter(|a| a.is_published()).collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}
