//! 院系视图：院系是课程与讲师上的标签，不单独建表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, BatchResult, ErrorCode};

super::declare_service!(DepartmentService);

impl DepartmentService {
    // 院系列表及课程数
    pub async fn list_departments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let departments = storage.list_departments().await?;
        Ok(HttpResponse::Ok().json(ApiResponse::list(departments, "Departments retrieved")))
    }

    // 院系下的课程与讲师
    pub async fn get_department(
        &self,
        name: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_department(&name).await? {
            Some(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Department retrieved"))),
            None => Ok(department_not_found(&name)),
        }
    }

    // 逐门删除院系课程，有在读选课的课程跳过并记录失败
    pub async fn delete_department(
        &self,
        name: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let Some(detail) = storage.get_department(&name).await? else {
            return Ok(department_not_found(&name));
        };

        let mut result: BatchResult<String, String> = BatchResult::default();
        for course in detail.courses {
            let active = match storage.count_active_enrollments_for_course(course.id).await {
                Ok(n) => n,
                Err(e) => {
                    result.push_err(course.code, e.message());
                    continue;
                }
            };
            if active > 0 {
                result.push_err(
                    course.code,
                    format!("Course has {active} active enrollment(s)"),
                );
                continue;
            }
            match storage.delete_course(course.id).await {
                Ok(true) => result.push_ok(course.code),
                Ok(false) => result.push_err(course.code, "Course not found"),
                Err(e) => result.push_err(course.code, e.message()),
            }
        }

        info!("Department '{}' deletion: {}", name, result.summary());
        let message = result.summary();
        Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
    }
}

fn department_not_found(name: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::DepartmentNotFound,
        format!("Department '{name}' not found"),
    ))
}
