pub mod academic_sessions;
pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod course_reps;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod faqs;
pub mod lecturer;
pub mod schedules;
pub mod student;
pub mod system;
pub mod timetables;
pub mod users;

pub use academic_sessions::configure_session_routes;
pub use announcements::configure_announcement_routes;
pub use auth::configure_auth_routes;
pub use course_reps::configure_chat_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use enrollments::configure_enrollment_routes;
pub use faqs::configure_faq_routes;
pub use lecturer::configure_lecturer_routes;
pub use schedules::configure_schedule_routes;
pub use student::configure_student_routes;
pub use system::configure_system_routes;
pub use timetables::configure_timetable_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_system_routes)
        .configure(configure_user_routes)
        .configure(configure_session_routes)
        .configure(configure_course_routes)
        .configure(configure_department_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_schedule_routes)
        .configure(configure_timetable_routes)
        .configure(configure_announcement_routes)
        .configure(configure_faq_routes)
        .configure(configure_chat_routes)
        .configure(configure_lecturer_routes)
        .configure(configure_student_routes);
}
