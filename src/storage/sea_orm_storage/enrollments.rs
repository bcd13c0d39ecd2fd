//! 选课存储实现

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{
    AcademicSessions, CoursePrerequisites, CourseStudents, Courses, Enrollments,
};
use crate::entity::{academic_sessions, course_prerequisites, course_students, courses, enrollments};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    enrollments::{
        entities::{
            EnrollOptions, EnrollOutcome, Enrollment, EnrollmentStatus, EnrollmentStatusUpdate,
            EnrollmentWithCourse,
        },
        requests::EnrollmentListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 选课
    ///
    /// 重复检查、容量检查、先修检查与写入在同一事务中完成；
    /// 被拒绝时不写入任何数据。`force` 跳过容量与先修检查。
    pub async fn enroll_student_impl(
        &self,
        student_id: i64,
        course_id: i64,
        session_id: i64,
        options: EnrollOptions,
    ) -> Result<EnrollOutcome> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let duplicate = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::AcademicSessionId.eq(session_id))
            .count(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;
        if duplicate > 0 {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let course = Courses::find_by_id(course_id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
            .ok_or_else(|| CampusError::not_found(format!("Course {course_id} not found")))?;

        if !options.force {
            let active = Enrollments::find()
                .filter(enrollments::Column::CourseId.eq(course_id))
                .filter(enrollments::Column::AcademicSessionId.eq(session_id))
                .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
                .count(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("统计选课失败: {e}")))?;
            if active >= course.capacity.max(0) as u64 {
                return Ok(EnrollOutcome::CourseFull {
                    capacity: course.capacity,
                });
            }

            let missing = missing_prerequisites(&txn, student_id, course_id).await?;
            if !missing.is_empty() {
                return Ok(EnrollOutcome::PrerequisitesMissing(missing));
            }
        }

        let created = enrollments::ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            academic_session_id: Set(session_id),
            status: Set(EnrollmentStatus::Active.as_str().to_string()),
            grade: Set(None),
            remarks: Set(None),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建选课失败: {e}")))?;

        let mirrored = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::StudentId.eq(student_id))
            .count(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程学生失败: {e}")))?;
        if mirrored == 0 {
            course_students::ActiveModel {
                course_id: Set(course_id),
                student_id: Set(student_id),
                added_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("写入课程学生失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(EnrollOutcome::Created(created.into_enrollment()))
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<Enrollment>> {
        let mut select = Enrollments::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(enrollments::Column::CourseId.eq(course_id));
        }
        if let Some(session_id) = query.session_id {
            select = select.filter(enrollments::Column::AcademicSessionId.eq(session_id));
        }
        if let Some(status) = query.status {
            select = select.filter(enrollments::Column::Status.eq(status.as_str()));
        }

        select = select.order_by_desc(enrollments::Column::EnrolledAt);

        self.fetch_page(select, query.page, query.size, |m| m.into_enrollment())
            .await
    }

    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: EnrollmentStatusUpdate,
    ) -> Result<Option<Enrollment>> {
        let Some(existing) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: enrollments::ActiveModel = existing.into();
        if let Some(status) = update.status {
            model.status = Set(status.as_str().to_string());
        }
        if update.grade.is_some() {
            model.grade = Set(update.grade);
        }
        if update.remarks.is_some() {
            model.remarks = Set(update.remarks);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新选课失败: {e}")))?;

        Ok(Some(updated.into_enrollment()))
    }

    /// 删除选课；该学生在此课程没有其他选课时同时移除课程学生关联
    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?
        else {
            return Ok(false);
        };

        Enrollments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除选课失败: {e}")))?;

        let remaining = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(existing.student_id))
            .filter(enrollments::Column::CourseId.eq(existing.course_id))
            .count(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计选课失败: {e}")))?;

        if remaining == 0 {
            CourseStudents::delete_many()
                .filter(course_students::Column::CourseId.eq(existing.course_id))
                .filter(course_students::Column::StudentId.eq(existing.student_id))
                .exec(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("删除课程学生失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    /// 学生的全部选课记录，附带课程与学期名称
    pub async fn list_student_enrollments_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<EnrollmentWithCourse>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .order_by_desc(enrollments::Column::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let course_map: HashMap<i64, courses::Model> = Courses::find()
            .filter(courses::Column::Id.is_in(rows.iter().map(|r| r.course_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let session_map: HashMap<i64, String> = AcademicSessions::find()
            .filter(
                academic_sessions::Column::Id
                    .is_in(rows.iter().map(|r| r.academic_session_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学期失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let course = course_map.get(&row.course_id)?.summary();
                let session_name = session_map
                    .get(&row.academic_session_id)
                    .cloned()
                    .unwrap_or_default();
                Some(EnrollmentWithCourse {
                    enrollment: row.into_enrollment(),
                    course,
                    session_name,
                })
            })
            .collect())
    }

    /// 学生在读（active）的课程 ID
    pub async fn list_student_course_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;

        let mut ids: Vec<i64> = rows.into_iter().map(|r| r.course_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    pub async fn count_active_enrollments_for_student_impl(&self, student_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计选课失败: {e}")))
    }

    /// 是否存在该课程的 active 选课记录；course_students 镜像不随状态变化
    pub async fn is_actively_enrolled_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(count > 0)
    }
}

/// 学生尚未完成（completed）的先修课程代码
async fn missing_prerequisites<C: ConnectionTrait>(
    conn: &C,
    student_id: i64,
    course_id: i64,
) -> Result<Vec<String>> {
    let prerequisite_ids: Vec<i64> = CoursePrerequisites::find()
        .filter(course_prerequisites::Column::CourseId.eq(course_id))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询先修课程失败: {e}")))?
        .into_iter()
        .map(|p| p.prerequisite_id)
        .collect();

    if prerequisite_ids.is_empty() {
        return Ok(Vec::new());
    }

    let completed: Vec<i64> = Enrollments::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::CourseId.is_in(prerequisite_ids.clone()))
        .filter(enrollments::Column::Status.eq(EnrollmentStatus::Completed.as_str()))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询已修课程失败: {e}")))?
        .into_iter()
        .map(|e| e.course_id)
        .collect();

    let missing_ids: Vec<i64> = prerequisite_ids
        .into_iter()
        .filter(|id| !completed.contains(id))
        .collect();

    if missing_ids.is_empty() {
        return Ok(Vec::new());
    }

    let codes = Courses::find()
        .filter(courses::Column::Id.is_in(missing_ids))
        .order_by_asc(courses::Column::Code)
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询先修课程失败: {e}")))?
        .into_iter()
        .map(|c| c.code)
        .collect();

    Ok(codes)
}
