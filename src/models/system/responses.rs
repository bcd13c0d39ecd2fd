use serde::Serialize;

use super::entities::SystemSetting;

/// 公开的系统信息
#[derive(Debug, Serialize)]
pub struct SystemInfoResponse {
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub allow_self_enroll: bool,
    pub current_session: Option<String>,
}

/// 管理员配置列表响应
#[derive(Debug, Serialize)]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

/// 管理后台统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub admins: u64,
    pub lecturers: u64,
    pub students: u64,
    pub inactive_users: u64,
    pub courses: u64,
    pub departments: u64,
    pub active_enrollments: u64,
    pub schedules: u64,
    pub assignments: u64,
    pub pending_grading: u64,
    pub published_timetables: u64,
    pub announcements: u64,
    pub current_session: Option<String>,
    pub uptime_seconds: i64,
}
