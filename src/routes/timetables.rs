use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::timetables::requests::{
    CreateTimetableRequest, ExamSessionRequest, TimetableListParams, UpdateExamSessionRequest,
    UpdateTimetableRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::TimetableService;
use crate::utils::{SafeIDI64, SafeSessionIdI64};

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_timetables(
    req: HttpRequest,
    query: web::Query<TimetableListParams>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_timetables(query.into_inner(), &req).await
}

pub async fn create_timetable(
    req: HttpRequest,
    body: web::Json<CreateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.create_timetable(body.into_inner(), &req).await
}

pub async fn get_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.get_timetable(id.0, &req).await
}

pub async fn update_timetable(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_timetable(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_timetable(id.0, &req).await
}

pub async fn publish(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.set_published(id.0, true, &req).await
}

pub async fn unpublish(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.set_published(id.0, false, &req).await
}

pub async fn add_session(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ExamSessionRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .add_session(id.0, body.into_inner(), &req)
        .await
}

pub async fn update_session(
    req: HttpRequest,
    id: SafeIDI64,
    session_id: SafeSessionIdI64,
    body: web::Json<UpdateExamSessionRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_session(id.0, session_id.0, body.into_inner(), &req)
        .await
}

pub async fn remove_session(
    req: HttpRequest,
    id: SafeIDI64,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .remove_session(id.0, session_id.0, &req)
        .await
}

pub(crate) async fn list_visible(
    req: HttpRequest,
    query: web::Query<TimetableListParams>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.list_visible(query.into_inner(), &req).await
}

pub(crate) async fn get_visible(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.get_visible(id.0, &req).await
}

pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/timetables")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_timetables))
                    .route("", web::post().to(create_timetable))
                    .route("/{id}", web::get().to(get_timetable))
                    .route("/{id}", web::put().to(update_timetable))
                    .route("/{id}", web::delete().to(delete_timetable))
                    .route("/{id}/publish", web::post().to(publish))
                    .route("/{id}/unpublish", web::post().to(unpublish))
                    .route("/{id}/sessions", web::post().to(add_session))
                    .route("/{id}/sessions/{session_id}", web::put().to(update_session))
                    .route(
                        "/{id}/sessions/{session_id}",
                        web::delete().to(remove_session),
                    ),
            ),
    );

    // 按调用者角色过滤
    cfg.service(
        web::scope("/api/timetables")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_visible))
            .route("/{id}", web::get().to(get_visible)),
    );
}
