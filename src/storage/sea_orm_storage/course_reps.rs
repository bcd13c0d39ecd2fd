//! 课代表与课程聊天存储实现

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::courses::load_users;
use crate::entity::prelude::{ChatMessages, CourseReps, CourseStudents, Students};
use crate::entity::{chat_messages, course_reps, course_students, students};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    course_reps::entities::{AppointOutcome, ChatMessage, CourseRep},
    users::entities::User,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 任命课代表，学生必须在该课程名单中
    pub async fn appoint_course_rep_impl(
        &self,
        course_id: i64,
        student_id: i64,
        appointed_by: i64,
    ) -> Result<AppointOutcome> {
        let enrolled = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程学生失败: {e}")))?;
        if enrolled == 0 {
            return Ok(AppointOutcome::NotEnrolled);
        }

        if self.is_course_rep_impl(course_id, student_id).await? {
            return Ok(AppointOutcome::AlreadyAppointed);
        }

        let created = course_reps::ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            appointed_by: Set(appointed_by),
            appointed_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("任命课代表失败: {e}")))?;

        let mut reps = self.assemble_reps(vec![created]).await?;
        match reps.pop() {
            Some(rep) => Ok(AppointOutcome::Appointed(rep)),
            None => Err(CampusError::not_found(format!(
                "Student {student_id} not found"
            ))),
        }
    }

    pub async fn remove_course_rep_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let result = CourseReps::delete_many()
            .filter(course_reps::Column::CourseId.eq(course_id))
            .filter(course_reps::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("移除课代表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_course_reps_impl(&self, course_id: i64) -> Result<Vec<CourseRep>> {
        let rows = CourseReps::find()
            .filter(course_reps::Column::CourseId.eq(course_id))
            .order_by_asc(course_reps::Column::AppointedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课代表失败: {e}")))?;

        self.assemble_reps(rows).await
    }

    pub async fn is_course_rep_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let count = CourseReps::find()
            .filter(course_reps::Column::CourseId.eq(course_id))
            .filter(course_reps::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课代表失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn create_chat_message_impl(
        &self,
        course_id: i64,
        sender: &User,
        content: &str,
    ) -> Result<ChatMessage> {
        let created = chat_messages::ActiveModel {
            course_id: Set(course_id),
            sender_id: Set(sender.id),
            sender_role: Set(sender.role.to_string()),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("发送消息失败: {e}")))?;

        Ok(created.into_message(sender.full_name.clone()))
    }

    /// 最新消息在前
    pub async fn list_chat_messages_impl(
        &self,
        course_id: i64,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<ChatMessage>> {
        let select = ChatMessages::find()
            .filter(chat_messages::Column::CourseId.eq(course_id))
            .order_by_desc(chat_messages::Column::CreatedAt)
            .order_by_desc(chat_messages::Column::Id);

        let messages = self.fetch_page(select, page, size, |m| m).await?;

        let user_map = load_users(&self.db, messages.items.iter().map(|m| m.sender_id)).await?;

        Ok(PaginatedResponse {
            items: messages
                .items
                .into_iter()
                .map(|m| {
                    let name = user_map
                        .get(&m.sender_id)
                        .map(|u| u.full_name.clone())
                        .unwrap_or_default();
                    m.into_message(name)
                })
                .collect(),
            pagination: messages.pagination,
        })
    }

    /// 补全学号与姓名
    async fn assemble_reps(&self, rows: Vec<course_reps::Model>) -> Result<Vec<CourseRep>> {
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
            .filter_map(|row| {
                let student = student_map.get(&row.student_id)?;
                let user = user_map.get(&student.user_id)?;
                Some(CourseRep {
                    id: row.id,
                    course_id: row.course_id,
                    student_id: row.student_id,
                    matric_number: student.matric_number.clone(),
                    full_name: user.full_name.clone(),
                    appointed_by: row.appointed_by,
                    appointed_at: crate::entity::to_datetime(row.appointed_at),
                })
            })
            .collect())
    }
}
