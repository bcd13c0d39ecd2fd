//! 数据模型定义
//!
//! 业务实体、请求与响应结构，与 `entity` 模块中的数据库实体分离。

pub mod academic_sessions;
pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod course_reps;
pub mod courses;
pub mod enrollments;
pub mod faqs;
pub mod schedules;
pub mod system;
pub mod timetables;
pub mod users;

pub use common::{
    ApiResponse, BatchFailure, BatchResult, PaginatedResponse, PaginationInfo, PaginationQuery,
};

use serde::{Deserialize, Serialize};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

macro_rules! define_error_codes {
    ($($variant:ident = $code:literal),* $(,)?) => {
        /// 业务错误码，出现在响应信封的 `error` 字段中
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum ErrorCode {
            $($variant = $code,)*
        }

        impl ErrorCode {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

define_error_codes! {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    AccountInactive = 2001,
    RegisterFailed = 2002,
    UserNotFound = 2004,
    UserEmailInvalid = 2010,
    UserPasswordInvalid = 2011,
    UserAlreadyExists = 2012,
    CanNotDeleteCurrentUser = 2020,
    UserDeleteBlocked = 2021,

    // 学期
    SessionNotFound = 3004,
    NoActiveSession = 3005,

    // 课程与院系
    CourseNotFound = 4004,
    CourseAlreadyExists = 4009,
    CourseDeleteBlocked = 4010,
    LecturerNotFound = 4104,
    LecturerAlreadyAssigned = 4109,
    LecturerNotAssigned = 4110,
    DepartmentNotFound = 4204,

    // 选课
    StudentNotFound = 5004,
    EnrollmentNotFound = 5005,
    EnrollmentAlreadyExists = 5009,
    CourseFull = 5010,
    PrerequisiteNotMet = 5011,
    InvalidStatusTransition = 5012,
    ImportFileParseFailed = 5020,
    ImportFileMissingColumn = 5021,
    ImportFileDataInvalid = 5022,

    // 课表
    ScheduleNotFound = 6004,

    // 作业
    AssignmentNotFound = 7004,
    SubmissionNotFound = 7005,
    SubmissionAlreadyExists = 7009,
    SubmissionDeadlinePassed = 7010,
    SubmissionAlreadyGraded = 7011,

    // 考试时间表
    TimetableNotFound = 8004,
    ExamSessionNotFound = 8005,
    TimetablePublished = 8010,

    // 公告、FAQ、课代表与聊天
    AnnouncementNotFound = 9004,
    FaqNotFound = 9104,
    CourseRepNotFound = 9204,
    CourseRepAlreadyExists = 9209,
    ChatPermissionDenied = 9303,

    // 系统设置
    SettingNotFound = 9904,
    SettingValueInvalid = 9910,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
