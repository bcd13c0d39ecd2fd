pub mod bulk;
pub mod create;
pub mod delete;
pub mod get;
pub mod lecturers;
pub mod list;
pub mod portal;
pub mod update;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::courses::requests::{
    BulkCreateCoursesRequest, CourseListParams, CreateCourseRequest, LecturerIdsRequest,
    UpdateCourseRequest,
};
use crate::storage::Storage;

super::declare_service!(CourseService);

impl CourseService {
    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        body: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, body, request).await
    }

    // 同一院系批量建课
    pub async fn bulk_create_courses(
        &self,
        body: BulkCreateCoursesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::bulk_create_courses(self, body, request).await
    }

    pub async fn get_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_course(self, id, request).await
    }

    pub async fn update_course(
        &self,
        id: i64,
        body: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, id, body, request).await
    }

    pub async fn delete_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_course(self, id, request).await
    }

    pub async fn list_course_lecturers(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturers::list_course_lecturers(self, id, request).await
    }

    // 分配一个或多个讲师，全部校验通过才写入
    pub async fn assign_lecturers(
        &self,
        id: i64,
        body: LecturerIdsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturers::assign_lecturers(self, id, body, request).await
    }

    // 将讲师列表同步为请求中的列表
    pub async fn sync_lecturers(
        &self,
        id: i64,
        body: LecturerIdsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturers::sync_lecturers(self, id, body, request).await
    }

    pub async fn unassign_lecturer(
        &self,
        id: i64,
        lecturer_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lecturers::unassign_lecturer(self, id, lecturer_id, request).await
    }

    // 讲师端：我的课程
    pub async fn my_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        portal::lecturer_courses(self, request).await
    }

    // 讲师端：课程学生名单
    pub async fn course_students(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        portal::course_students(self, id, request).await
    }
}

/// 找出不存在的先修课程 ID
pub(crate) async fn missing_prerequisites(
    storage: &Arc<dyn Storage>,
    ids: &[i64],
) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<i64> = storage
        .list_courses_by_ids(ids)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}
