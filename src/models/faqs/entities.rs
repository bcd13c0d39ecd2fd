use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::announcements::entities::Audience;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub audience: Audience,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub audience: Audience,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub audience: Option<Audience>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// FAQ 查询条件
#[derive(Debug, Clone, Default)]
pub struct FaqFilter {
    pub audiences: Option<Vec<Audience>>,
    pub published_only: bool,
    pub category: Option<String>,
    pub search: Option<String>,
}
