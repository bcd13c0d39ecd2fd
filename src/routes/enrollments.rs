use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::enrollments::requests::{
    BatchEnrollmentRequest, CreateEnrollmentRequest, EnrollmentListParams,
    UpdateEnrollmentStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    body: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(body.into_inner(), false, &req)
        .await
}

pub async fn force_enrollment(
    req: HttpRequest,
    body: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(body.into_inner(), true, &req)
        .await
}

pub async fn batch_enroll(
    req: HttpRequest,
    body: web::Json<BatchEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.batch_enroll(body.into_inner(), &req).await
}

pub async fn import_enrollments(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.import_enrollments(payload, &req).await
}

pub async fn get_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_enrollment(id.0, &req).await
}

pub async fn update_status(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateEnrollmentStatusRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_status(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.delete_enrollment(id.0, &req).await
}

pub(crate) async fn self_enroll(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.self_enroll(id.0, &req).await
}

pub(crate) async fn student_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_courses(&req).await
}

pub(crate) async fn student_enrollments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.my_enrollments(&req).await
}

pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_enrollments))
                    .route("", web::post().to(create_enrollment))
                    .route("/force", web::post().to(force_enrollment))
                    .route("/batch", web::post().to(batch_enroll))
                    .service(
                        web::resource("/import")
                            .wrap(RateLimit::bulk_import())
                            .route(web::post().to(import_enrollments)),
                    )
                    .route("/{id}", web::get().to(get_enrollment))
                    .route("/{id}", web::put().to(update_status))
                    .route("/{id}", web::delete().to(delete_enrollment)),
            ),
    );
}
