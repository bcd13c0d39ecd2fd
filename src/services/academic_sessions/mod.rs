pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::academic_sessions::requests::{CreateSessionRequest, UpdateSessionRequest};

super::declare_service!(AcademicSessionService);

impl AcademicSessionService {
    pub async fn list_sessions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::list_sessions(self, request).await
    }

    pub async fn current_session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::current_session(self, request).await
    }

    pub async fn create_session(
        &self,
        body: CreateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_session(self, body, request).await
    }

    pub async fn get_session(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_session(self, id, request).await
    }

    pub async fn update_session(
        &self,
        id: i64,
        body: UpdateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_session(self, id, body, request).await
    }

    // 设为当前学期，其他学期同时失效
    pub async fn activate_session(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::activate_session(self, id, request).await
    }

    pub async fn delete_session(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_session(self, id, request).await
    }
}
