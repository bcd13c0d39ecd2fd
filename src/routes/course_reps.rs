use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::course_reps::requests::{
    AppointCourseRepRequest, ChatHistoryParams, SendMessageRequest,
};
use crate::services::CourseRepService;
use crate::utils::{SafeCourseIdI64, SafeStudentIdI64};

static COURSE_REP_SERVICE: Lazy<CourseRepService> = Lazy::new(CourseRepService::new_lazy);

// 以下三个处理函数挂载在 /api/admin/courses 作用域下
pub async fn list_reps(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_REP_SERVICE.list_reps(course_id.0, &req).await
}

pub async fn appoint_rep(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    body: web::Json<AppointCourseRepRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_REP_SERVICE
        .appoint_rep(course_id.0, body.into_inner(), &req)
        .await
}

pub async fn remove_rep(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_REP_SERVICE
        .remove_rep(course_id.0, student_id.0, &req)
        .await
}

pub async fn list_messages(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<ChatHistoryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_REP_SERVICE
        .list_messages(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn send_message(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_REP_SERVICE
        .send_message(course_id.0, body.into_inner(), &req)
        .await
}

pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    // 权限在服务层按课程判断
    cfg.service(
        web::scope("/api/chat")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/courses/{course_id}/messages")
                    .route(web::get().to(list_messages))
                    .route(web::post().to(send_message).wrap(RateLimit::chat())),
            ),
    );
}
