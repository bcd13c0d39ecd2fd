use serde::Deserialize;

use super::entities::Audience;

#[derive(Debug, Deserialize)]
pub struct FaqListParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFaqRequest {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default = "default_audience")]
    pub audience: Audience,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub audience: Option<Audience>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

fn default_audience() -> Audience {
    Audience::All
}

fn default_published() -> bool {
    true
}
