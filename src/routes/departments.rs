use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::DepartmentService;
use crate::utils::SafeNameParam;

static DEPARTMENT_SERVICE: Lazy<DepartmentService> = Lazy::new(DepartmentService::new_lazy);

pub async fn list_departments(req: HttpRequest) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.list_departments(&req).await
}

pub async fn get_department(req: HttpRequest, name: SafeNameParam) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.get_department(name.0, &req).await
}

pub async fn delete_department(req: HttpRequest, name: SafeNameParam) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.delete_department(name.0, &req).await
}

pub fn configure_department_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/departments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route("", web::get().to(list_departments))
                    .route("/{name}", web::get().to(get_department))
                    .route("/{name}", web::delete().to(delete_department)),
            ),
    );
}
