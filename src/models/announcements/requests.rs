use crate::models::common::PaginationQuery;
use serde::{Deserialize, Deserializer};

use super::entities::Audience;

#[derive(Debug, Deserialize)]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default = "default_audience")]
    pub audience: Audience,
    pub course_id: Option<i64>,
    #[serde(default)]
    pub is_pinned: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience: Option<Audience>,
    /// 显式传 null 清除课程
    #[serde(default, deserialize_with = "double_option")]
    pub course_id: Option<Option<i64>>,
    pub is_pinned: Option<bool>,
}

fn default_audience() -> Audience {
    Audience::All
}

/// 区分字段缺失与显式 null
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_null_vs_missing() {
        let req: UpdateAnnouncementRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(req.course_id, None);
        let req: UpdateAnnouncementRequest = serde_json::from_str(r#"{"course_id":null}"#).unwrap();
        assert_eq!(req.course_id, Some(None));
        let req: UpdateAnnouncementRequest = serde_json::from_str(r#"{"course_id":3}"#).unwrap();
        assert_eq!(req.course_id, Some(Some(3)));
    }
}
