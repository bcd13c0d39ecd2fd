//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic_sessions;
mod announcements;
mod assignments;
mod course_reps;
mod courses;
mod enrollments;
mod faqs;
mod schedules;
mod stats;
mod system_settings;
mod timetables;
mod users;

use crate::config::AppConfig;
use crate::errors::{CampusError, Result};
use crate::models::{PaginatedResponse, PaginationInfo};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 基于已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 分页查询并转换为业务模型
    pub(crate) async fn fetch_page<E, T>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        convert: impl Fn(E::Model) -> T + Send,
    ) -> Result<PaginatedResponse<T>>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Send + Sync + 'static,
        T: Send,
    {
        let page = page.max(1);
        let size = size.max(1);
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CampusError::database_operation(format!("统计总数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询分页数据失败: {e}")))?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(convert).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    academic_sessions::entities::{AcademicSession, AcademicSessionUpdate, NewAcademicSession},
    announcements::entities::{
        Announcement, AnnouncementUpdate, AnnouncementVisibility, NewAnnouncement,
    },
    assignments::{
        entities::{
            Assignment, AssignmentUpdate, NewAssignment, NewSubmission, Submission,
            SubmissionStatus, SubmissionWithStudent,
        },
        requests::AssignmentListQuery,
    },
    course_reps::entities::{AppointOutcome, ChatMessage, CourseRep},
    courses::{
        entities::{
            AssignLecturerOutcome, Course, CourseDetail, CourseStudentSummary, CourseUpdate,
            DepartmentDetail, DepartmentSummary, LecturerSummary, NewCourse,
        },
        requests::CourseListQuery,
    },
    enrollments::{
        entities::{
            EnrollOptions, EnrollOutcome, Enrollment, EnrollmentStatusUpdate,
            EnrollmentWithCourse,
        },
        requests::EnrollmentListQuery,
    },
    faqs::entities::{Faq, FaqFilter, FaqUpdate, NewFaq},
    schedules::{
        entities::{NewSchedule, Schedule, ScheduleUpdate},
        requests::ScheduleListQuery,
    },
    system::{
        entities::{SettingAudit, SystemSetting},
        responses::DashboardStats,
    },
    timetables::{
        entities::{
            ExamSession, ExamSessionMutation, ExamSessionScope, ExamSessionUpdate, ExamTimetable,
            ExamTimetableUpdate, NewExamSession, NewExamTimetable,
        },
        requests::TimetableListQuery,
    },
    users::{
        entities::{
            LecturerProfile, NewUser, ProfileInput, StudentProfile, User, UserRole, UserUpdate,
            UserWithProfile,
        },
        requests::UserListQuery,
    },
};

use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户管理模块
    async fn create_user(
        &self,
        user: NewUser,
        profile: Option<ProfileInput>,
    ) -> Result<UserWithProfile> {
        self.create_user_impl(user, profile).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_with_profile(&self, id: i64) -> Result<Option<UserWithProfile>> {
        self.get_user_with_profile_impl(id).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<UserWithProfile>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users_by_role(&self, role: &UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn find_identity_conflict(
        &self,
        email: Option<&str>,
        matric_number: Option<&str>,
        staff_id: Option<&str>,
        exclude_user_id: Option<i64>,
    ) -> Result<Option<&'static str>> {
        self.find_identity_conflict_impl(email, matric_number, staff_id, exclude_user_id).await
    }

    // 档案查询模块
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_matric(&self, matric_number: &str) -> Result<Option<StudentProfile>> {
        self.get_student_by_matric_impl(matric_number).await
    }

    async fn get_lecturer_by_id(&self, id: i64) -> Result<Option<LecturerProfile>> {
        self.get_lecturer_by_id_impl(id).await
    }

    async fn get_lecturer_by_user_id(&self, user_id: i64) -> Result<Option<LecturerProfile>> {
        self.get_lecturer_by_user_id_impl(user_id).await
    }

    // 学期管理模块
    async fn create_session(&self, session: NewAcademicSession) -> Result<AcademicSession> {
        self.create_session_impl(session).await
    }

    async fn get_session_by_id(&self, id: i64) -> Result<Option<AcademicSession>> {
        self.get_session_by_id_impl(id).await
    }

    async fn get_session_by_name(&self, name: &str) -> Result<Option<AcademicSession>> {
        self.get_session_by_name_impl(name).await
    }

    async fn get_current_session(&self) -> Result<Option<AcademicSession>> {
        self.get_current_session_impl().await
    }

    async fn list_sessions(&self) -> Result<Vec<AcademicSession>> {
        self.list_sessions_impl().await
    }

    async fn update_session(
        &self,
        id: i64,
        update: AcademicSessionUpdate,
    ) -> Result<Option<AcademicSession>> {
        self.update_session_impl(id, update).await
    }

    async fn activate_session(&self, id: i64) -> Result<Option<AcademicSession>> {
        self.activate_session_impl(id).await
    }

    async fn count_session_references(&self, id: i64) -> Result<u64> {
        self.count_session_references_impl(id).await
    }

    async fn delete_session(&self, id: i64) -> Result<bool> {
        self.delete_session_impl(id).await
    }

    // 课程管理模块
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>> {
        self.get_course_detail_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<PaginatedResponse<Course>> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>> {
        self.list_courses_by_ids_impl(ids).await
    }

    async fn find_existing_course_codes(&self, codes: &[String]) -> Result<Vec<String>> {
        self.find_existing_course_codes_impl(codes).await
    }

    async fn update_course(&self, id: i64, update: CourseUpdate) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn count_active_enrollments_for_course(&self, course_id: i64) -> Result<u64> {
        self.count_active_enrollments_for_course_impl(course_id).await
    }

    // 课程讲师模块
    async fn assign_lecturer(
        &self,
        course_id: i64,
        lecturer_id: i64,
    ) -> Result<AssignLecturerOutcome> {
        self.assign_lecturer_impl(course_id, lecturer_id).await
    }

    async fn unassign_lecturer(&self, course_id: i64, lecturer_id: i64) -> Result<bool> {
        self.unassign_lecturer_impl(course_id, lecturer_id).await
    }

    async fn is_lecturer_assigned(&self, course_id: i64, lecturer_id: i64) -> Result<bool> {
        self.is_lecturer_assigned_impl(course_id, lecturer_id).await
    }

    async fn list_course_lecturer_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        self.list_course_lecturer_ids_impl(course_id).await
    }

    async fn list_course_lecturers(&self, course_id: i64) -> Result<Vec<LecturerSummary>> {
        self.list_course_lecturers_impl(course_id).await
    }

    async fn list_lecturer_course_ids(&self, lecturer_id: i64) -> Result<Vec<i64>> {
        self.list_lecturer_course_ids_impl(lecturer_id).await
    }

    async fn list_courses_for_lecturer(&self, lecturer_id: i64) -> Result<Vec<Course>> {
        self.list_courses_for_lecturer_impl(lecturer_id).await
    }

    async fn count_courses_for_lecturer(&self, lecturer_id: i64) -> Result<u64> {
        self.count_courses_for_lecturer_impl(lecturer_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<CourseStudentSummary>> {
        self.list_course_students_impl(course_id).await
    }

    // 院系模块
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>> {
        self.list_departments_impl().await
    }

    async fn get_department(&self, name: &str) -> Result<Option<DepartmentDetail>> {
        self.get_department_impl(name).await
    }

    // 选课模块
    async fn enroll_student(
        &self,
        student_id: i64,
        course_id: i64,
        session_id: i64,
        options: EnrollOptions,
    ) -> Result<EnrollOutcome> {
        self.enroll_student_impl(student_id, course_id, session_id, options).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: EnrollmentStatusUpdate,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<EnrollmentWithCourse>> {
        self.list_student_enrollments_impl(student_id).await
    }

    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_student_course_ids_impl(student_id).await
    }

    async fn count_active_enrollments_for_student(&self, student_id: i64) -> Result<u64> {
        self.count_active_enrollments_for_student_impl(student_id).await
    }

    async fn is_actively_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.is_actively_enrolled_impl(student_id, course_id).await
    }

    // 课表模块
    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule> {
        self.create_schedule_impl(schedule).await
    }

    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<Schedule>> {
        self.get_schedule_by_id_impl(id).await
    }

    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<PaginatedResponse<Schedule>> {
        self.list_schedules_with_pagination_impl(query).await
    }

    async fn update_schedule(&self, id: i64, update: ScheduleUpdate) -> Result<Option<Schedule>> {
        self.update_schedule_impl(id, update).await
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool> {
        self.delete_schedule_impl(id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, student_id).await
    }

    async fn resubmit(
        &self,
        id: i64,
        content: Option<String>,
        files: Vec<String>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        self.resubmit_impl(id, content, files, status).await
    }

    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, score, feedback, graded_by).await
    }

    async fn list_submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        self.list_submissions_for_assignment_impl(assignment_id).await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_student_submissions_impl(student_id, assignment_ids).await
    }

    // 考试时间表模块
    async fn create_timetable(&self, timetable: NewExamTimetable) -> Result<ExamTimetable> {
        self.create_timetable_impl(timetable).await
    }

    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<ExamTimetable>> {
        self.get_timetable_by_id_impl(id).await
    }

    async fn list_timetables_with_pagination(
        &self,
        query: TimetableListQuery,
    ) -> Result<PaginatedResponse<ExamTimetable>> {
        self.list_timetables_with_pagination_impl(query).await
    }

    async fn update_timetable(
        &self,
        id: i64,
        update: ExamTimetableUpdate,
    ) -> Result<Option<ExamTimetable>> {
        self.update_timetable_impl(id, update).await
    }

    async fn delete_timetable(&self, id: i64) -> Result<bool> {
        self.delete_timetable_impl(id).await
    }

    async fn set_timetable_published(
        &self,
        id: i64,
        published: bool,
    ) -> Result<Option<ExamTimetable>> {
        self.set_timetable_published_impl(id, published).await
    }

    async fn add_exam_session(
        &self,
        timetable_id: i64,
        session: NewExamSession,
    ) -> Result<ExamSessionMutation<ExamSession>> {
        self.add_exam_session_impl(timetable_id, session).await
    }

    async fn update_exam_session(
        &self,
        timetable_id: i64,
        session_id: i64,
        update: ExamSessionUpdate,
    ) -> Result<ExamSessionMutation<ExamSession>> {
        self.update_exam_session_impl(timetable_id, session_id, update).await
    }

    async fn remove_exam_session(
        &self,
        timetable_id: i64,
        session_id: i64,
    ) -> Result<ExamSessionMutation<()>> {
        self.remove_exam_session_impl(timetable_id, session_id).await
    }

    async fn list_exam_sessions(
        &self,
        timetable_id: i64,
        scope: &ExamSessionScope,
    ) -> Result<Vec<ExamSession>> {
        self.list_exam_sessions_impl(timetable_id, scope).await
    }

    // 公告模块
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        self.create_announcement_impl(announcement).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn list_announcements_with_pagination(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Announcement>> {
        self.list_announcements_with_pagination_impl(visibility, page, size).await
    }

    async fn update_announcement(
        &self,
        id: i64,
        update: AnnouncementUpdate,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    // FAQ 模块
    async fn create_faq(&self, faq: NewFaq) -> Result<Faq> {
        self.create_faq_impl(faq).await
    }

    async fn get_faq_by_id(&self, id: i64) -> Result<Option<Faq>> {
        self.get_faq_by_id_impl(id).await
    }

    async fn list_faqs(&self, filter: FaqFilter) -> Result<Vec<Faq>> {
        self.list_faqs_impl(filter).await
    }

    async fn update_faq(&self, id: i64, update: FaqUpdate) -> Result<Option<Faq>> {
        self.update_faq_impl(id, update).await
    }

    async fn delete_faq(&self, id: i64) -> Result<bool> {
        self.delete_faq_impl(id).await
    }

    // 课代表与课程聊天模块
    async fn appoint_course_rep(
        &self,
        course_id: i64,
        student_id: i64,
        appointed_by: i64,
    ) -> Result<AppointOutcome> {
        self.appoint_course_rep_impl(course_id, student_id, appointed_by).await
    }

    async fn remove_course_rep(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.remove_course_rep_impl(course_id, student_id).await
    }

    async fn list_course_reps(&self, course_id: i64) -> Result<Vec<CourseRep>> {
        self.list_course_reps_impl(course_id).await
    }

    async fn is_course_rep(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.is_course_rep_impl(course_id, student_id).await
    }

    async fn create_chat_message(
        &self,
        course_id: i64,
        sender: &User,
        content: &str,
    ) -> Result<ChatMessage> {
        self.create_chat_message_impl(course_id, sender, content).await
    }

    async fn list_chat_messages(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<ChatMessage>> {
        self.list_chat_messages_impl(course_id, page, size).await
    }

    // 系统设置模块
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>> {
        self.get_setting_by_key_impl(key).await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        self.update_setting_impl(key, value, user_id, ip_address).await
    }

    async fn list_setting_audits(
        &self,
        key: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<SettingAudit>> {
        self.list_setting_audits_impl(key, page, size).await
    }

    // 统计模块
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.dashboard_stats_impl().await
    }
}
