use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::models::common::BatchResult;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department: String,
    pub college: String,
    pub credits: i32,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 课程简要信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: i64,
    pub code: String,
    pub title: String,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            code: course.code.clone(),
            title: course.title.clone(),
        }
    }
}

/// 讲师简要信息（讲师档案 + 用户）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerSummary {
    pub lecturer_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub staff_id: String,
    pub department: String,
}

/// 选课学生简要信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStudentSummary {
    pub student_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub matric_number: String,
    pub level: Option<i32>,
}

/// 课程详情
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub prerequisites: Vec<CourseSummary>,
    pub lecturers: Vec<LecturerSummary>,
    pub enrolled_count: u64,
}

/// 新课程（存储层输入）
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department: String,
    pub college: String,
    pub credits: i32,
    pub capacity: i32,
    pub prerequisite_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub credits: Option<i32>,
    pub capacity: Option<i32>,
    /// Some 时整体替换先修课程
    pub prerequisite_ids: Option<Vec<i64>>,
}

/// 院系汇总
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub colleges: Vec<String>,
    pub course_count: u64,
}

/// 院系详情
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentDetail {
    pub department: String,
    pub courses: Vec<Course>,
    pub lecturers: Vec<LecturerSummary>,
}

/// 讲师同步结果，两轮分别汇总
#[derive(Debug, Clone, Serialize)]
pub struct LecturerSyncResult {
    pub added: BatchResult<i64, i64>,
    pub removed: BatchResult<i64, i64>,
}

/// 讲师分配的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignLecturerOutcome {
    Assigned,
    AlreadyAssigned,
    LecturerNotFound,
}

/// 对比当前与目标讲师列表，返回 (待添加, 待移除)，保持输入顺序并去重
pub fn diff_lecturers(current: &[i64], requested: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let current_set: HashSet<i64> = current.iter().copied().collect();
    let requested_set: HashSet<i64> = requested.iter().copied().collect();

    let mut seen = HashSet::new();
    let to_add = requested
        .iter()
        .copied()
        .filter(|id| !current_set.contains(id) && seen.insert(*id))
        .collect();
    let to_remove = current
        .iter()
        .copied()
        .filter(|id| !requested_set.contains(id))
        .collect();
    (to_add, to_remove)
}

/// 找出批量请求中重复的课程代码（已规范化）
pub fn duplicate_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for code in codes {
        if !seen.insert(code) {
            duplicates.insert(code.to_string());
        }
    }
    duplicates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_lecturers() {
        let (to_add, to_remove) = diff_lecturers(&[1, 2, 3], &[3, 4, 4, 5]);
        assert_eq!(to_add, vec![4, 5]);
        assert_eq!(to_remove, vec![1, 2]);

        let (to_add, to_remove) = diff_lecturers(&[1, 2], &[2, 1]);
        assert!(to_add.is_empty());
        assert!(to_remove.is_empty());

        let (to_add, to_remove) = diff_lecturers(&[7], &[]);
        assert!(to_add.is_empty());
        assert_eq!(to_remove, vec![7]);
    }

    #[test]
    fn test_duplicate_codes() {
        assert_eq!(
            duplicate_codes(["CSC101", "CSC102", "CSC101", "MTH101", "CSC102", "CSC101"]),
            vec!["CSC101".to_string(), "CSC102".to_string()]
        );
        assert!(duplicate_codes(["CSC101", "CSC102"]).is_empty());
    }
}
