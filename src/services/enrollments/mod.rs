pub mod batch;
pub mod create;
pub mod import;
pub mod manage;
pub mod resolve;
pub mod student;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::enrollments::requests::{
    BatchEnrollmentRequest, CreateEnrollmentRequest, EnrollmentListParams,
    UpdateEnrollmentStatusRequest,
};

super::declare_service!(EnrollmentService);

impl EnrollmentService {
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_enrollments(self, query, request).await
    }

    // 单条选课，force 时跳过容量与先修检查
    pub async fn create_enrollment(
        &self,
        body: CreateEnrollmentRequest,
        force: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, body, force, request).await
    }

    pub async fn batch_enroll(
        &self,
        body: BatchEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        batch::batch_enroll(self, body, request).await
    }

    pub async fn import_enrollments(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_enrollments(self, payload, request).await
    }

    pub async fn get_enrollment(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_enrollment(self, id, request).await
    }

    pub async fn update_status(
        &self,
        id: i64,
        body: UpdateEnrollmentStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_status(self, id, body, request).await
    }

    pub async fn delete_enrollment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_enrollment(self, id, request).await
    }

    // 学生自主选课（当前学期）
    pub async fn self_enroll(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::self_enroll(self, course_id, request).await
    }

    pub async fn my_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::my_courses(self, request).await
    }

    pub async fn my_enrollments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::my_enrollments(self, request).await
    }
}
