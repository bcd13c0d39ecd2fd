//! 学期存储实现

use super::SeaOrmStorage;
use crate::entity::academic_sessions::{ActiveModel, Column};
use crate::entity::prelude::{AcademicSessions, Enrollments, ExamTimetables};
use crate::entity::{enrollments, exam_timetables};
use crate::errors::{CampusError, Result};
use crate::models::academic_sessions::entities::{
    AcademicSession, AcademicSessionUpdate, NewAcademicSession,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_session_impl(&self, session: NewAcademicSession) -> Result<AcademicSession> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        if session.is_active {
            deactivate_all(&txn, now).await?;
        }

        let created = ActiveModel {
            name: Set(session.name.trim().to_string()),
            start_date: Set(session.start_date),
            end_date: Set(session.end_date),
            is_active: Set(session.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_session())
    }

    pub async fn get_session_by_id_impl(&self, id: i64) -> Result<Option<AcademicSession>> {
        let result = AcademicSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn get_session_by_name_impl(&self, name: &str) -> Result<Option<AcademicSession>> {
        let result = AcademicSessions::find()
            .filter(Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn get_current_session_impl(&self) -> Result<Option<AcademicSession>> {
        let result = AcademicSessions::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询当前学期失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 按创建时间倒序列出全部学期
    pub async fn list_sessions_impl(&self) -> Result<Vec<AcademicSession>> {
        let sessions = AcademicSessions::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取学期列表失败: {e}")))?;

        Ok(sessions.into_iter().map(|m| m.into_session()).collect())
    }

    pub async fn update_session_impl(
        &self,
        id: i64,
        update: AcademicSessionUpdate,
    ) -> Result<Option<AcademicSession>> {
        let Some(existing) = AcademicSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学期失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if update.start_date.is_some() {
            model.start_date = Set(update.start_date);
        }
        if update.end_date.is_some() {
            model.end_date = Set(update.end_date);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新学期失败: {e}")))?;

        Ok(Some(updated.into_session()))
    }

    /// 设为当前学期，其余学期同时停用
    pub async fn activate_session_impl(&self, id: i64) -> Result<Option<AcademicSession>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = AcademicSessions::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学期失败: {e}")))?
        else {
            return Ok(None);
        };

        deactivate_all(&txn, now).await?;

        let mut model: ActiveModel = existing.into();
        model.is_active = Set(true);
        model.updated_at = Set(now);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("激活学期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_session()))
    }

    pub async fn count_session_references_impl(&self, id: i64) -> Result<u64> {
        let enrollment_count = Enrollments::find()
            .filter(enrollments::Column::AcademicSessionId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计选课失败: {e}")))?;

        let timetable_count = ExamTimetables::find()
            .filter(exam_timetables::Column::AcademicSessionId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计时间表失败: {e}")))?;

        Ok(enrollment_count + timetable_count)
    }

    pub async fn delete_session_impl(&self, id: i64) -> Result<bool> {
        let result = AcademicSessions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

async fn deactivate_all<C: ConnectionTrait>(conn: &C, now: i64) -> Result<()> {
    AcademicSessions::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::IsActive.eq(true))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("停用学期失败: {e}")))?;
    Ok(())
}
