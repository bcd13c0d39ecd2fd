//! 学生端入口

use actix_web::web;

use super::{assignments, enrollments, schedules, timetables};
use crate::middlewares;
use crate::models::users::entities::UserRole;

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/student")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Student))
                    .route("/courses", web::get().to(enrollments::student_courses))
                    .route(
                        "/courses/{id}/enroll",
                        web::post().to(enrollments::self_enroll),
                    )
                    .route(
                        "/enrollments",
                        web::get().to(enrollments::student_enrollments),
                    )
                    .route("/schedules", web::get().to(schedules::student_schedules))
                    .route("/assignments", web::get().to(assignments::student_list))
                    .route("/assignments/{id}", web::get().to(assignments::student_get))
                    .route("/assignments/{id}/submit", web::post().to(assignments::submit))
                    .route(
                        "/assignments/{id}/submission",
                        web::put().to(assignments::resubmit),
                    )
                    .route("/timetables", web::get().to(timetables::list_visible))
                    .route("/timetables/{id}", web::get().to(timetables::get_visible)),
            ),
    );
}
