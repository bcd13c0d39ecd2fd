//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_sessions;
pub mod announcements;
pub mod assignments;
pub mod chat_messages;
pub mod course_lecturers;
pub mod course_prerequisites;
pub mod course_reps;
pub mod course_students;
pub mod courses;
pub mod enrollments;
pub mod exam_invigilators;
pub mod exam_sessions;
pub mod exam_timetables;
pub mod faqs;
pub mod lecturers;
pub mod schedules;
pub mod students;
pub mod submissions;
pub mod system_settings;
pub mod system_settings_audit;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
