//! 讲师端入口，汇总各资源中面向讲师的处理函数

use actix_web::web;

use super::{assignments, courses, schedules, timetables};
use crate::middlewares;
use crate::models::users::entities::UserRole;

pub fn configure_lecturer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/lecturer")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Lecturer))
                    .route("/courses", web::get().to(courses::lecturer_courses))
                    .route(
                        "/courses/{id}/students",
                        web::get().to(courses::lecturer_course_students),
                    )
                    .route("/schedules", web::get().to(schedules::lecturer_schedules))
                    .route("/assignments", web::get().to(assignments::lecturer_list))
                    .route("/assignments", web::post().to(assignments::create_assignment))
                    .route("/assignments/{id}", web::get().to(assignments::lecturer_get))
                    .route(
                        "/assignments/{id}",
                        web::put().to(assignments::update_assignment),
                    )
                    .route(
                        "/assignments/{id}",
                        web::delete().to(assignments::delete_assignment),
                    )
                    .route(
                        "/assignments/{id}/submissions",
                        web::get().to(assignments::list_submissions),
                    )
                    .route(
                        "/submissions/{id}/grade",
                        web::put().to(assignments::grade_submission),
                    )
                    .route("/timetables", web::get().to(timetables::list_visible))
                    .route("/timetables/{id}", web::get().to(timetables::get_visible)),
            ),
    );
}
