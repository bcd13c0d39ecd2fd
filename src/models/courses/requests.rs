use crate::models::common::PaginationQuery;
use crate::utils::validate::{normalize_course_code, validate_course_code};
use serde::{Deserialize, Serialize};

use super::entities::NewCourse;

#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<String>,
    pub college: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: u64,
    pub size: u64,
    pub department: Option<String>,
    pub college: Option<String>,
    pub search: Option<String>,
}

impl From<CourseListParams> for CourseListQuery {
    fn from(params: CourseListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            department: params.department,
            college: params.college,
            search: params.search,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department: String,
    pub college: String,
    #[serde(default = "default_credits")]
    pub credits: i32,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default)]
    pub prerequisite_ids: Vec<i64>,
}

impl CreateCourseRequest {
    /// 校验并转换为存储层输入
    pub fn into_new_course(self) -> Result<NewCourse, &'static str> {
        validate_course_code(self.code.trim())?;
        validate_course_fields(&self.title, self.credits, self.capacity)?;
        if self.department.trim().is_empty() || self.college.trim().is_empty() {
            return Err("Department and college are required");
        }
        Ok(NewCourse {
            code: normalize_course_code(&self.code),
            title: self.title.trim().to_string(),
            description: self.description,
            department: self.department.trim().to_string(),
            college: self.college.trim().to_string(),
            credits: self.credits,
            capacity: self.capacity,
            prerequisite_ids: self.prerequisite_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub credits: Option<i32>,
    pub capacity: Option<i32>,
    pub prerequisite_ids: Option<Vec<i64>>,
}

/// 批量建课中的单条课程，院系信息来自外层请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCourseItem {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: i32,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateCoursesRequest {
    pub department: String,
    pub college: String,
    pub courses: Vec<BulkCourseItem>,
}

#[derive(Debug, Deserialize)]
pub struct LecturerIdsRequest {
    pub lecturer_ids: Vec<i64>,
}

pub fn validate_course_fields(title: &str, credits: i32, capacity: i32) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("Course title is required");
    }
    if !(0..=30).contains(&credits) {
        return Err("Credits must be between 0 and 30");
    }
    if capacity < 1 {
        return Err("Capacity must be at least 1");
    }
    Ok(())
}

fn default_credits() -> i32 {
    3
}

fn default_capacity() -> i32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_new_course_normalizes_code() {
        let req: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "code": " csc301 ",
            "title": "Operating Systems",
            "department": "Computer Science",
            "college": "Science"
        }))
        .unwrap();
        let course = req.into_new_course().unwrap();
        assert_eq!(course.code, "CSC301");
        assert_eq!(course.credits, 3);
        assert_eq!(course.capacity, 100);
    }

    #[test]
    fn test_into_new_course_rejects_bad_input() {
        let req: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "code": "CSC301",
            "title": "OS",
            "department": "CS",
            "college": "Science",
            "capacity": 0
        }))
        .unwrap();
        assert!(req.into_new_course().is_err());
    }
}
