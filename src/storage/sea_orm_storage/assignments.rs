//! 作业与提交存储实现

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::courses::load_users;
use crate::entity::prelude::{Assignments, Students, Submissions};
use crate::entity::{assignments, students, submissions};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::{
            Assignment, AssignmentUpdate, NewAssignment, NewSubmission, Submission,
            SubmissionStatus, SubmissionWithStudent,
        },
        requests::AssignmentListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

fn files_to_json(files: &[String]) -> Result<Option<String>> {
    if files.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(files)
        .map(Some)
        .map_err(|e| CampusError::internal(format!("序列化附件列表失败: {e}")))
}

impl SeaOrmStorage {
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let created = assignments::ActiveModel {
            course_id: Set(assignment.course_id),
            lecturer_id: Set(assignment.lecturer_id),
            title: Set(assignment.title),
            description: Set(assignment.description),
            due_date: Set(assignment.due_date),
            total_marks: Set(assignment.total_marks),
            allow_late_submission: Set(assignment.allow_late_submission),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(created.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 作业分页，按截止时间升序
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        let mut select = Assignments::find();

        if let Some(course_ids) = query.course_ids {
            select = select.filter(assignments::Column::CourseId.is_in(course_ids));
        }
        if let Some(lecturer_id) = query.lecturer_id {
            select = select.filter(assignments::Column::LecturerId.eq(lecturer_id));
        }

        select = select.order_by_asc(assignments::Column::DueDate);

        self.fetch_page(select, query.page, query.size, |m| m.into_assignment())
            .await
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: assignments::ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if update.description.is_some() {
            model.description = Set(update.description);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date);
        }
        if let Some(total_marks) = update.total_marks {
            model.total_marks = Set(total_marks);
        }
        if let Some(allow_late) = update.allow_late_submission {
            model.allow_late_submission = Set(allow_late);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(updated.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(submissions::Column::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除提交失败: {e}")))?;

        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_submission_impl(&self, submission: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let created = submissions::ActiveModel {
            assignment_id: Set(submission.assignment_id),
            student_id: Set(submission.student_id),
            content: Set(submission.content),
            files: Set(files_to_json(&submission.files)?),
            status: Set(submission.status.as_str().to_string()),
            is_late: Set(submission.status == SubmissionStatus::Late),
            score: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            submitted_at: Set(now),
            updated_at: Set(now),
            graded_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(created.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn resubmit_impl(
        &self,
        id: i64,
        content: Option<String>,
        files: Vec<String>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: submissions::ActiveModel = existing.into();
        model.content = Set(content);
        model.files = Set(files_to_json(&files)?);
        model.status = Set(status.as_str().to_string());
        model.is_late = Set(status == SubmissionStatus::Late);
        model.submitted_at = Set(now);
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    /// 评分，状态置为 graded
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: submissions::ActiveModel = existing.into();
        model.score = Set(Some(score));
        model.feedback = Set(feedback);
        model.graded_by = Set(Some(graded_by));
        model.status = Set(SubmissionStatus::Graded.as_str().to_string());
        model.graded_at = Set(Some(now));
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    /// 作业的全部提交，附带学生学号与姓名
    pub async fn list_submissions_for_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        let rows = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submissions::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let student_map: HashMap<i64, students::Model> = Students::find()
            .filter(students::Column::Id.is_in(rows.iter().map(|r| r.student_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let user_map = load_users(&self.db, student_map.values().map(|s| s.user_id)).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let student = student_map.get(&row.student_id);
                let matric_number = student.map(|s| s.matric_number.clone()).unwrap_or_default();
                let student_name = student
                    .and_then(|s| user_map.get(&s.user_id))
                    .map(|u| u.full_name.clone())
                    .unwrap_or_default();
                SubmissionWithStudent {
                    submission: row.into_submission(),
                    matric_number,
                    student_name,
                }
            })
            .collect())
    }

    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Submissions::find()
            .filter(submissions::Column::StudentId.eq(student_id))
            .filter(submissions::Column::AssignmentId.is_in(assignment_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_submission()).collect())
    }
}
