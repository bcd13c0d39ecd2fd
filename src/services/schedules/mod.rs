pub mod manage;
pub mod portal;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleListParams, UpdateScheduleRequest,
};

super::declare_service!(ScheduleService);

impl ScheduleService {
    pub async fn list_schedules(
        &self,
        query: ScheduleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_schedules(self, query, request).await
    }

    // 讲师必须已分配到该课程
    pub async fn create_schedule(
        &self,
        body: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_schedule(self, body, request).await
    }

    pub async fn get_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_schedule(self, id, request).await
    }

    pub async fn update_schedule(
        &self,
        id: i64,
        body: UpdateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_schedule(self, id, body, request).await
    }

    pub async fn delete_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_schedule(self, id, request).await
    }

    pub async fn lecturer_schedules(
        &self,
        query: ScheduleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        portal::lecturer_schedules(self, query, request).await
    }

    pub async fn student_schedules(
        &self,
        query: ScheduleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        portal::student_schedules(self, query, request).await
    }
}
