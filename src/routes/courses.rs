use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::course_reps;
use crate::middlewares;
use crate::models::courses::requests::{
    BulkCreateCoursesRequest, CourseListParams, CreateCourseRequest, LecturerIdsRequest,
    UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeIDI64, SafeLecturerIdI64};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(body.into_inner(), &req).await
}

pub async fn bulk_create_courses(
    req: HttpRequest,
    body: web::Json<BulkCreateCoursesRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .bulk_create_courses(body.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(id.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(id.0, &req).await
}

pub async fn list_course_lecturers(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_course_lecturers(id.0, &req).await
}

pub async fn assign_lecturers(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<LecturerIdsRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .assign_lecturers(id.0, body.into_inner(), &req)
        .await
}

pub async fn sync_lecturers(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<LecturerIdsRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .sync_lecturers(id.0, body.into_inner(), &req)
        .await
}

pub async fn unassign_lecturer(
    req: HttpRequest,
    id: SafeIDI64,
    lecturer_id: SafeLecturerIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .unassign_lecturer(id.0, lecturer_id.0, &req)
        .await
}

pub(crate) async fn lecturer_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.my_courses(&req).await
}

pub(crate) async fn lecturer_course_students(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.course_students(id.0, &req).await
}

pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_courses))
                    .route("", web::post().to(create_course))
                    .route("/bulk", web::post().to(bulk_create_courses))
                    .route("/{id}", web::get().to(get_course))
                    .route("/{id}", web::put().to(update_course))
                    .route("/{id}", web::delete().to(delete_course))
                    .route("/{id}/lecturers", web::get().to(list_course_lecturers))
                    .route("/{id}/lecturers", web::post().to(assign_lecturers))
                    .route("/{id}/lecturers", web::put().to(sync_lecturers))
                    .route(
                        "/{id}/lecturers/{lecturer_id}",
                        web::delete().to(unassign_lecturer),
                    )
                    .route("/{course_id}/reps", web::get().to(course_reps::list_reps))
                    .route("/{course_id}/reps", web::post().to(course_reps::appoint_rep))
                    .route(
                        "/{course_id}/reps/{student_id}",
                        web::delete().to(course_reps::remove_rep),
                    ),
            ),
    );
}
