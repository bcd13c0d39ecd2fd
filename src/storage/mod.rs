use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户及其档案
    async fn create_user(&self, user: NewUser, profile: Option<ProfileInput>)
    -> Result<UserWithProfile>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 获取用户及档案
    async fn get_user_with_profile(&self, id: i64) -> Result<Option<UserWithProfile>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 更新用户信息，角色变化时迁移档案
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<UserWithProfile>>;
    // 删除用户及其档案
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 按角色统计用户数
    async fn count_users_by_role(&self, role: &UserRole) -> Result<u64>;
    // 查找与邮箱、学号、工号冲突的字段
    async fn find_identity_conflict(
        &self,
        email: Option<&str>,
        matric_number: Option<&str>,
        staff_id: Option<&str>,
        exclude_user_id: Option<i64>,
    ) -> Result<Option<&'static str>>;

    /// 档案查询方法
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentProfile>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentProfile>>;
    async fn get_student_by_matric(&self, matric_number: &str) -> Result<Option<StudentProfile>>;
    async fn get_lecturer_by_id(&self, id: i64) -> Result<Option<LecturerProfile>>;
    async fn get_lecturer_by_user_id(&self, user_id: i64) -> Result<Option<LecturerProfile>>;

    /// 学期管理方法
    // 创建学期，is_active 时停用其他学期
    async fn create_session(&self, session: NewAcademicSession) -> Result<AcademicSession>;
    async fn get_session_by_id(&self, id: i64) -> Result<Option<AcademicSession>>;
    async fn get_session_by_name(&self, name: &str) -> Result<Option<AcademicSession>>;
    // 当前学期
    async fn get_current_session(&self) -> Result<Option<AcademicSession>>;
    async fn list_sessions(&self) -> Result<Vec<AcademicSession>>;
    async fn update_session(
        &self,
        id: i64,
        update: AcademicSessionUpdate,
    ) -> Result<Option<AcademicSession>>;
    // 设为当前学期
    async fn activate_session(&self, id: i64) -> Result<Option<AcademicSession>>;
    // 被选课或考试时间表引用的次数
    async fn count_session_references(&self, id: i64) -> Result<u64>;
    async fn delete_session(&self, id: i64) -> Result<bool>;

    /// 课程管理方法
    // 创建课程及先修关系
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // 课程详情（先修课程、讲师、在读人数）
    async fn get_course_detail(&self, id: i64) -> Result<Option<CourseDetail>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<PaginatedResponse<Course>>;
    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>>;
    // 已存在的课程代码
    async fn find_existing_course_codes(&self, codes: &[String]) -> Result<Vec<String>>;
    async fn update_course(&self, id: i64, update: CourseUpdate) -> Result<Option<Course>>;
    // 删除课程及全部关联数据
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 课程在读（active）选课数
    async fn count_active_enrollments_for_course(&self, course_id: i64) -> Result<u64>;

    /// 课程讲师方法
    async fn assign_lecturer(
        &self,
        course_id: i64,
        lecturer_id: i64,
    ) -> Result<AssignLecturerOutcome>;
    // 取消任课，同时删除该讲师在此课程的课表
    async fn unassign_lecturer(&self, course_id: i64, lecturer_id: i64) -> Result<bool>;
    async fn is_lecturer_assigned(&self, course_id: i64, lecturer_id: i64) -> Result<bool>;
    async fn list_course_lecturer_ids(&self, course_id: i64) -> Result<Vec<i64>>;
    async fn list_course_lecturers(&self, course_id: i64) -> Result<Vec<LecturerSummary>>;
    async fn list_lecturer_course_ids(&self, lecturer_id: i64) -> Result<Vec<i64>>;
    async fn list_courses_for_lecturer(&self, lecturer_id: i64) -> Result<Vec<Course>>;
    async fn count_courses_for_lecturer(&self, lecturer_id: i64) -> Result<u64>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<CourseStudentSummary>>;

    /// 院系方法
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>>;
    async fn get_department(&self, name: &str) -> Result<Option<DepartmentDetail>>;

    /// 选课方法
    // 在事务中完成重复、容量、先修检查并写入选课记录
    async fn enroll_student(
        &self,
        student_id: i64,
        course_id: i64,
        session_id: i64,
        options: EnrollOptions,
    ) -> Result<EnrollOutcome>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: EnrollmentStatusUpdate,
    ) -> Result<Option<Enrollment>>;
    // 删除选课，没有其他选课时移除课程学生关联
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    async fn list_student_enrollments(&self, student_id: i64)
    -> Result<Vec<EnrollmentWithCourse>>;
    // 学生在读课程
    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    async fn count_active_enrollments_for_student(&self, student_id: i64) -> Result<u64>;
    async fn is_actively_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool>;

    /// 课表方法
    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule>;
    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<Schedule>>;
    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<PaginatedResponse<Schedule>>;
    async fn update_schedule(&self, id: i64, update: ScheduleUpdate) -> Result<Option<Schedule>>;
    async fn delete_schedule(&self, id: i64) -> Result<bool>;

    /// 作业方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>>;
    // 删除作业及其提交
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 提交方法
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission(&self, assignment_id: i64, student_id: i64)
    -> Result<Option<Submission>>;
    // 重新提交，覆盖内容与状态
    async fn resubmit(
        &self,
        id: i64,
        content: Option<String>,
        files: Vec<String>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>>;
    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;

    /// 考试时间表方法
    async fn create_timetable(&self, timetable: NewExamTimetable) -> Result<ExamTimetable>;
    async fn get_timetable_by_id(&self, id: i64) -> Result<Option<ExamTimetable>>;
    async fn list_timetables_with_pagination(
        &self,
        query: TimetableListQuery,
    ) -> Result<PaginatedResponse<ExamTimetable>>;
    async fn update_timetable(
        &self,
        id: i64,
        update: ExamTimetableUpdate,
    ) -> Result<Option<ExamTimetable>>;
    // 删除时间表及全部场次
    async fn delete_timetable(&self, id: i64) -> Result<bool>;
    async fn set_timetable_published(
        &self,
        id: i64,
        published: bool,
    ) -> Result<Option<ExamTimetable>>;
    async fn add_exam_session(
        &self,
        timetable_id: i64,
        session: NewExamSession,
    ) -> Result<ExamSessionMutation<ExamSession>>;
    async fn update_exam_session(
        &self,
        timetable_id: i64,
        session_id: i64,
        update: ExamSessionUpdate,
    ) -> Result<ExamSessionMutation<ExamSession>>;
    async fn remove_exam_session(
        &self,
        timetable_id: i64,
        session_id: i64,
    ) -> Result<ExamSessionMutation<()>>;
    // 按可见范围列出场次
    async fn list_exam_sessions(
        &self,
        timetable_id: i64,
        scope: &ExamSessionScope,
    ) -> Result<Vec<ExamSession>>;

    /// 公告方法
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn list_announcements_with_pagination(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Announcement>>;
    async fn update_announcement(
        &self,
        id: i64,
        update: AnnouncementUpdate,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// FAQ 方法
    async fn create_faq(&self, faq: NewFaq) -> Result<Faq>;
    async fn get_faq_by_id(&self, id: i64) -> Result<Option<Faq>>;
    async fn list_faqs(&self, filter: FaqFilter) -> Result<Vec<Faq>>;
    async fn update_faq(&self, id: i64, update: FaqUpdate) -> Result<Option<Faq>>;
    async fn delete_faq(&self, id: i64) -> Result<bool>;

    /// 课代表与课程聊天方法
    async fn appoint_course_rep(
        &self,
        course_id: i64,
        student_id: i64,
        appointed_by: i64,
    ) -> Result<AppointOutcome>;
    async fn remove_course_rep(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn list_course_reps(&self, course_id: i64) -> Result<Vec<CourseRep>>;
    async fn is_course_rep(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn create_chat_message(
        &self,
        course_id: i64,
        sender: &User,
        content: &str,
    ) -> Result<ChatMessage>;
    // 最新消息在前
    async fn list_chat_messages(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<ChatMessage>>;

    /// 系统设置方法
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>>;
    // 更新设置并写入审计记录
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>>;
    async fn list_setting_audits(
        &self,
        key: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<SettingAudit>>;

    /// 统计方法（uptime_seconds 由调用方填写）
    async fn dashboard_stats(&self) -> Result<DashboardStats>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
