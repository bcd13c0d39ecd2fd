pub mod chat;
pub mod reps;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::course_reps::requests::{
    AppointCourseRepRequest, ChatHistoryParams, SendMessageRequest,
};

super::declare_service!(CourseRepService);

impl CourseRepService {
    pub async fn list_reps(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reps::list_reps(self, course_id, request).await
    }

    // 学生必须已在课程名单中
    pub async fn appoint_rep(
        &self,
        course_id: i64,
        body: AppointCourseRepRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reps::appoint_rep(self, course_id, body, request).await
    }

    pub async fn remove_rep(
        &self,
        course_id: i64,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reps::remove_rep(self, course_id, student_id, request).await
    }

    pub async fn list_messages(
        &self,
        course_id: i64,
        query: ChatHistoryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        chat::list_messages(self, course_id, query, request).await
    }

    pub async fn send_message(
        &self,
        course_id: i64,
        body: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        chat::send_message(self, course_id, body, request).await
    }
}
