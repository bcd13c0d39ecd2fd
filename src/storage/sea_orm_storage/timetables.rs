//! 考试时间表存储实现
//!
//! 已发布的时间表不允许增删改场次，检查与写入在同一事务内完成。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Courses, ExamInvigilators, ExamSessions, ExamTimetables};
use crate::entity::{courses, exam_invigilators, exam_sessions, exam_timetables};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    timetables::{
        entities::{
            ExamSession, ExamSessionMutation, ExamSessionScope, ExamSessionUpdate, ExamTimetable,
            ExamTimetableUpdate, NewExamSession, NewExamTimetable,
        },
        requests::TimetableListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Query,
};

impl SeaOrmStorage {
    pub async fn create_timetable_impl(&self, timetable: NewExamTimetable) -> Result<ExamTimetable> {
        let now = chrono::Utc::now().timestamp();

        let created = exam_timetables::ActiveModel {
            academic_session_id: Set(timetable.academic_session_id),
            title: Set(timetable.title),
            description: Set(timetable.description),
            is_published: Set(false),
            published_at: Set(None),
            created_by: Set(timetable.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建时间表失败: {e}")))?;

        Ok(created.into_timetable())
    }

    pub async fn get_timetable_by_id_impl(&self, id: i64) -> Result<Option<ExamTimetable>> {
        let result = ExamTimetables::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询时间表失败: {e}")))?;

        Ok(result.map(|m| m.into_timetable()))
    }

    pub async fn list_timetables_with_pagination_impl(
        &self,
        query: TimetableListQuery,
    ) -> Result<PaginatedResponse<ExamTimetable>> {
        let mut select = ExamTimetables::find();

        if let Some(session_id) = query.session_id {
            select = select.filter(exam_timetables::Column::AcademicSessionId.eq(session_id));
        }
        if query.published_only {
            select = select.filter(exam_timetables::Column::IsPublished.eq(true));
        }

        select = select.order_by_desc(exam_timetables::Column::CreatedAt);

        self.fetch_page(select, query.page, query.size, |m| m.into_timetable())
            .await
    }

    pub async fn update_timetable_impl(
        &self,
        id: i64,
        update: ExamTimetableUpdate,
    ) -> Result<Option<ExamTimetable>> {
        let Some(existing) = ExamTimetables::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询时间表失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: exam_timetables::ActiveModel = existing.into();
        if let Some(session_id) = update.academic_session_id {
            model.academic_session_id = Set(session_id);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if update.description.is_some() {
            model.description = Set(update.description);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新时间表失败: {e}")))?;

        Ok(Some(updated.into_timetable()))
    }

    pub async fn delete_timetable_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let session_ids: Vec<i64> = ExamSessions::find()
            .filter(exam_sessions::Column::TimetableId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考试场次失败: {e}")))?
            .into_iter()
            .map(|s| s.id)
            .collect();

        if !session_ids.is_empty() {
            ExamInvigilators::delete_many()
                .filter(exam_invigilators::Column::ExamSessionId.is_in(session_ids))
                .exec(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("删除监考安排失败: {e}")))?;
        }

        ExamSessions::delete_many()
            .filter(exam_sessions::Column::TimetableId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除考试场次失败: {e}")))?;

        let result = ExamTimetables::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除时间表失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 发布或撤回；发布时记录发布时间
    pub async fn set_timetable_published_impl(
        &self,
        id: i64,
        published: bool,
    ) -> Result<Option<ExamTimetable>> {
        let Some(existing) = ExamTimetables::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询时间表失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: exam_timetables::ActiveModel = existing.into();
        model.is_published = Set(published);
        model.published_at = Set(published.then_some(now));
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新发布状态失败: {e}")))?;

        Ok(Some(updated.into_timetable()))
    }

    pub async fn add_exam_session_impl(
        &self,
        timetable_id: i64,
        session: NewExamSession,
    ) -> Result<ExamSessionMutation<ExamSession>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(rejection) = check_editable(&txn, timetable_id).await? {
            return Ok(rejection);
        }

        let created = exam_sessions::ActiveModel {
            timetable_id: Set(timetable_id),
            course_id: Set(session.course_id),
            exam_date: Set(session.exam_date),
            start_time: Set(session.start_time),
            end_time: Set(session.end_time),
            venue: Set(session.venue),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建考试场次失败: {e}")))?;

        replace_invigilators(&txn, created.id, &session.invigilator_ids).await?;
        let assembled = assemble_sessions(&txn, vec![created]).await?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(into_single(assembled))
    }

    pub async fn update_exam_session_impl(
        &self,
        timetable_id: i64,
        session_id: i64,
        update: ExamSessionUpdate,
    ) -> Result<ExamSessionMutation<ExamSession>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(rejection) = check_editable(&txn, timetable_id).await? {
            return Ok(rejection);
        }

        let Some(existing) = find_session(&txn, timetable_id, session_id).await? else {
            return Ok(ExamSessionMutation::SessionNotFound);
        };

        let mut model: exam_sessions::ActiveModel = existing.into();
        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(exam_date) = update.exam_date {
            model.exam_date = Set(exam_date);
        }
        if let Some(start_time) = update.start_time {
            model.start_time = Set(start_time);
        }
        if let Some(end_time) = update.end_time {
            model.end_time = Set(end_time);
        }
        if let Some(venue) = update.venue {
            model.venue = Set(venue);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新考试场次失败: {e}")))?;

        if let Some(ref invigilator_ids) = update.invigilator_ids {
            replace_invigilators(&txn, session_id, invigilator_ids).await?;
        }
        let assembled = assemble_sessions(&txn, vec![updated]).await?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(into_single(assembled))
    }

    pub async fn remove_exam_session_impl(
        &self,
        timetable_id: i64,
        session_id: i64,
    ) -> Result<ExamSessionMutation<()>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(rejection) = check_editable(&txn, timetable_id).await? {
            return Ok(rejection);
        }

        if find_session(&txn, timetable_id, session_id).await?.is_none() {
            return Ok(ExamSessionMutation::SessionNotFound);
        }

        ExamInvigilators::delete_many()
            .filter(exam_invigilators::Column::ExamSessionId.eq(session_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除监考安排失败: {e}")))?;

        ExamSessions::delete_by_id(session_id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除考试场次失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(ExamSessionMutation::Done(()))
    }

    /// 按可见范围列出场次
    ///
    /// 讲师可见：任教课程的场次，以及自己监考的场次。
    pub async fn list_exam_sessions_impl(
        &self,
        timetable_id: i64,
        scope: &ExamSessionScope,
    ) -> Result<Vec<ExamSession>> {
        let mut select =
            ExamSessions::find().filter(exam_sessions::Column::TimetableId.eq(timetable_id));

        match scope {
            ExamSessionScope::All => {}
            ExamSessionScope::Courses(course_ids) => {
                select = select.filter(exam_sessions::Column::CourseId.is_in(course_ids.clone()));
            }
            ExamSessionScope::Lecturer {
                lecturer_id,
                course_ids,
            } => {
                let invigilated = Query::select()
                    .column(exam_invigilators::Column::ExamSessionId)
                    .from(exam_invigilators::Entity)
                    .and_where(exam_invigilators::Column::LecturerId.eq(*lecturer_id))
                    .to_owned();
                select = select.filter(
                    Condition::any()
                        .add(exam_sessions::Column::CourseId.is_in(course_ids.clone()))
                        .add(exam_sessions::Column::Id.in_subquery(invigilated)),
                );
            }
        }

        let rows = select
            .order_by_asc(exam_sessions::Column::ExamDate)
            .order_by_asc(exam_sessions::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询考试场次失败: {e}")))?;

        assemble_sessions(&self.db, rows).await
    }
}

/// 时间表不存在或已发布时返回拒绝结果
async fn check_editable<C: ConnectionTrait, T>(
    conn: &C,
    timetable_id: i64,
) -> Result<Option<ExamSessionMutation<T>>> {
    let timetable = ExamTimetables::find_by_id(timetable_id)
        .one(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询时间表失败: {e}")))?;

    Ok(match timetable {
        None => Some(ExamSessionMutation::TimetableNotFound),
        Some(t) if t.is_published => Some(ExamSessionMutation::Published),
        Some(_) => None,
    })
}

async fn find_session<C: ConnectionTrait>(
    conn: &C,
    timetable_id: i64,
    session_id: i64,
) -> Result<Option<exam_sessions::Model>> {
    ExamSessions::find_by_id(session_id)
        .filter(exam_sessions::Column::TimetableId.eq(timetable_id))
        .one(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询考试场次失败: {e}")))
}

async fn replace_invigilators<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
    lecturer_ids: &[i64],
) -> Result<()> {
    ExamInvigilators::delete_many()
        .filter(exam_invigilators::Column::ExamSessionId.eq(session_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("清除监考安排失败: {e}")))?;

    for lecturer_id in lecturer_ids {
        exam_invigilators::ActiveModel {
            exam_session_id: Set(session_id),
            lecturer_id: Set(*lecturer_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("写入监考安排失败: {e}")))?;
    }

    Ok(())
}

/// 补全课程信息与监考讲师
async fn assemble_sessions<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<exam_sessions::Model>,
) -> Result<Vec<ExamSession>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let course_map: HashMap<i64, courses::Model> = Courses::find()
        .filter(courses::Column::Id.is_in(rows.iter().map(|r| r.course_id).collect::<Vec<_>>()))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut invigilators: HashMap<i64, Vec<i64>> = HashMap::new();
    for row in ExamInvigilators::find()
        .filter(
            exam_invigilators::Column::ExamSessionId
                .is_in(rows.iter().map(|r| r.id).collect::<Vec<_>>()),
        )
        .order_by_asc(exam_invigilators::Column::Id)
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询监考安排失败: {e}")))?
    {
        invigilators
            .entry(row.exam_session_id)
            .or_default()
            .push(row.lecturer_id);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let course = course_map.get(&row.course_id);
            let ids = invigilators.remove(&row.id).unwrap_or_default();
            row.into_exam_session(course, ids)
        })
        .collect())
}

fn into_single(mut sessions: Vec<ExamSession>) -> ExamSessionMutation<ExamSession> {
    match sessions.pop() {
        Some(session) => ExamSessionMutation::Done(session),
        None => ExamSessionMutation::SessionNotFound,
    }
}
