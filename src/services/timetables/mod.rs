pub mod manage;
pub mod sessions;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    timetables::requests::{
        CreateTimetableRequest, ExamSessionRequest, TimetableListParams, UpdateExamSessionRequest,
        UpdateTimetableRequest,
    },
};

super::declare_service!(TimetableService);

impl TimetableService {
    pub async fn list_timetables(
        &self,
        query: TimetableListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_timetables(self, query, request).await
    }

    pub async fn create_timetable(
        &self,
        body: CreateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_timetable(self, body, request).await
    }

    pub async fn get_timetable(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_timetable(self, id, request).await
    }

    pub async fn update_timetable(
        &self,
        id: i64,
        body: UpdateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_timetable(self, id, body, request).await
    }

    pub async fn delete_timetable(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_timetable(self, id, request).await
    }

    // draft -> published -> draft
    pub async fn set_published(
        &self,
        id: i64,
        published: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::set_published(self, id, published, request).await
    }

    pub async fn add_session(
        &self,
        id: i64,
        body: ExamSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::add_session(self, id, body, request).await
    }

    pub async fn update_session(
        &self,
        id: i64,
        session_id: i64,
        body: UpdateExamSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::update_session(self, id, session_id, body, request).await
    }

    pub async fn remove_session(
        &self,
        id: i64,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::remove_session(self, id, session_id, request).await
    }

    // 按角色过滤的只读视图
    pub async fn list_visible(
        &self,
        query: TimetableListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        view::list_visible(self, query, request).await
    }

    pub async fn get_visible(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        view::get_visible(self, id, request).await
    }
}

pub(crate) fn timetable_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::TimetableNotFound,
        "Exam timetable not found",
    ))
}
