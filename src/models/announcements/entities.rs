use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

/// 公告与 FAQ 的目标受众
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    All,
    Students,
    Lecturers,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Students => "students",
            Self::Lecturers => "lecturers",
        }
    }

    /// 某角色可见的受众，None 表示不过滤（管理员）
    pub fn visible_to(role: &UserRole) -> Option<Vec<Audience>> {
        match role {
            UserRole::Admin => None,
            UserRole::Lecturer => Some(vec![Self::All, Self::Lecturers]),
            UserRole::Student => Some(vec![Self::All, Self::Students]),
        }
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Audience>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的受众: '{s}'. 支持: all, students, lecturers"
            ))
        })
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "students" => Ok(Self::Students),
            "lecturers" => Ok(Self::Lecturers),
            _ => Err(format!("Invalid audience: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub audience: Audience,
    /// 仅对该课程成员可见
    pub course_id: Option<i64>,
    pub created_by: i64,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 公告可见范围
#[derive(Debug, Clone, Default)]
pub struct AnnouncementVisibility {
    /// None 表示全部受众
    pub audiences: Option<Vec<Audience>>,
    /// None 表示全部课程公告可见
    pub course_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub course_id: Option<i64>,
    pub created_by: i64,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience: Option<Audience>,
    /// Some(None) 清除课程
    pub course_id: Option<Option<i64>>,
    pub is_pinned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_visibility() {
        assert_eq!(Audience::visible_to(&UserRole::Admin), None);
        let lecturer = Audience::visible_to(&UserRole::Lecturer).unwrap();
        assert!(lecturer.contains(&Audience::Lecturers));
        assert!(!lecturer.contains(&Audience::Students));
        let student = Audience::visible_to(&UserRole::Student).unwrap();
        assert!(student.contains(&Audience::All));
        assert!(!student.contains(&Audience::Lecturers));
    }
}
