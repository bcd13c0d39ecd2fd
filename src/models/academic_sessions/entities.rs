use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 学期（学年）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicSession {
    pub id: i64,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// 当前学期，同一时间至多一个
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新学期（存储层输入）
#[derive(Debug, Clone)]
pub struct NewAcademicSession {
    pub name: String,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AcademicSessionUpdate {
    pub name: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}
