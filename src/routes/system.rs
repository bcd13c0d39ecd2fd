use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::{SettingAuditParams, UpdateSettingRequest};
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_info(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_info(&request).await
}

pub async fn list_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_settings(&request).await
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_setting(key.0, body.into_inner(), &request)
        .await
}

pub async fn list_audits(
    request: HttpRequest,
    query: web::Query<SettingAuditParams>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_audits(query.into_inner(), &request).await
}

pub async fn dashboard_stats(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.dashboard_stats(&request).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/system").route("/info", web::get().to(get_info)));

    cfg.service(
        web::scope("/api/admin/settings")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_settings))
                    .route("/audits", web::get().to(list_audits))
                    .route("/{key}", web::put().to(update_setting)),
            ),
    );

    cfg.service(
        web::scope("/api/admin/stats")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(dashboard_stats)),
            ),
    );
}
