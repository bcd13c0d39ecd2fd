use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic_sessions::requests::{CreateSessionRequest, UpdateSessionRequest};
use crate::models::users::entities::UserRole;
use crate::services::AcademicSessionService;
use crate::utils::SafeIDI64;

static SESSION_SERVICE: Lazy<AcademicSessionService> =
    Lazy::new(AcademicSessionService::new_lazy);

pub async fn list_sessions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(&req).await
}

pub async fn current_session(req: HttpRequest) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.current_session(&req).await
}

pub async fn create_session(
    req: HttpRequest,
    body: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.create_session(body.into_inner(), &req).await
}

pub async fn get_session(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.get_session(id.0, &req).await
}

pub async fn update_session(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .update_session(id.0, body.into_inner(), &req)
        .await
}

pub async fn activate_session(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.activate_session(id.0, &req).await
}

pub async fn delete_session(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.delete_session(id.0, &req).await
}

pub fn configure_session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/sessions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_sessions))
                    .route("", web::post().to(create_session))
                    // 先于 /{id} 注册
                    .route("/current", web::get().to(current_session))
                    .route("/{id}", web::get().to(get_session))
                    .route("/{id}", web::put().to(update_session))
                    .route("/{id}", web::delete().to(delete_session))
                    .route("/{id}/activate", web::post().to(activate_session)),
            ),
    );
}
