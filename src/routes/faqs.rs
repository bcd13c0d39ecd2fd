use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::faqs::requests::{CreateFaqRequest, FaqListParams, UpdateFaqRequest};
use crate::models::users::entities::UserRole;
use crate::services::FaqService;
use crate::utils::SafeIDI64;

static FAQ_SERVICE: Lazy<FaqService> = Lazy::new(FaqService::new_lazy);

pub async fn list_faqs(
    req: HttpRequest,
    query: web::Query<FaqListParams>,
) -> ActixResult<HttpResponse> {
    FAQ_SERVICE.list(query.into_inner(), &req).await
}

pub async fn create_faq(
    req: HttpRequest,
    body: web::Json<CreateFaqRequest>,
) -> ActixResult<HttpResponse> {
    FAQ_SERVICE.create(body.into_inner(), &req).await
}

pub async fn get_faq(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FAQ_SERVICE.get(id.0, &req).await
}

pub async fn update_faq(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFaqRequest>,
) -> ActixResult<HttpResponse> {
    FAQ_SERVICE.update(id.0, body.into_inner(), &req).await
}

pub async fn delete_faq(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FAQ_SERVICE.delete(id.0, &req).await
}

pub fn configure_faq_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/faqs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_faqs))
                    .route("", web::post().to(create_faq))
                    .route("/{id}", web::get().to(get_faq))
                    .route("/{id}", web::put().to(update_faq))
                    .route("/{id}", web::delete().to(delete_faq)),
            ),
    );

    // 非管理员只看到面向自身角色的已发布条目
    cfg.service(
        web::scope("/api/faqs")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_faqs)),
    );
}
