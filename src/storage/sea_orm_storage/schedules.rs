use super::SeaOrmStorage;
use crate::entity::prelude::Schedules;
use crate::entity::schedules::{ActiveModel, Column};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    schedules::{
        entities::{NewSchedule, Schedule, ScheduleUpdate},
        requests::ScheduleListQuery,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_schedule_impl(&self, schedule: NewSchedule) -> Result<Schedule> {
        let now = chrono::Utc::now().timestamp();

        let created = ActiveModel {
            course_id: Set(schedule.course_id),
            lecturer_id: Set(schedule.lecturer_id),
            academic_session_id: Set(schedule.academic_session_id),
            date: Set(schedule.date),
            start_time: Set(schedule.start_time),
            end_time: Set(schedule.end_time),
            venue: Set(schedule.venue),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建课表失败: {e}")))?;

        Ok(created.into_schedule())
    }

    pub async fn get_schedule_by_id_impl(&self, id: i64) -> Result<Option<Schedule>> {
        let result = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule()))
    }

    /// 按日期、开始时间排序的课表分页
    pub async fn list_schedules_with_pagination_impl(
        &self,
        query: ScheduleListQuery,
    ) -> Result<PaginatedResponse<Schedule>> {
        let mut select = Schedules::find();

        if let Some(course_ids) = query.course_ids {
            select = select.filter(Column::CourseId.is_in(course_ids));
        }
        if let Some(lecturer_id) = query.lecturer_id {
            select = select.filter(Column::LecturerId.eq(lecturer_id));
        }
        if let Some(session_id) = query.session_id {
            select = select.filter(Column::AcademicSessionId.eq(session_id));
        }
        if let Some(ref date) = query.date {
            select = select.filter(Column::Date.eq(date.trim()));
        }

        select = select
            .order_by_asc(Column::Date)
            .order_by_asc(Column::StartTime);

        self.fetch_page(select, query.page, query.size, |m| m.into_schedule())
            .await
    }

    pub async fn update_schedule_impl(
        &self,
        id: i64,
        update: ScheduleUpdate,
    ) -> Result<Option<Schedule>> {
        let Some(existing) = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课表失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(lecturer_id) = update.lecturer_id {
            model.lecturer_id = Set(lecturer_id);
        }
        if update.academic_session_id.is_some() {
            model.academic_session_id = Set(update.academic_session_id);
        }
        if let Some(date) = update.date {
            model.date = Set(date);
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
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新课表失败: {e}")))?;

        Ok(Some(updated.into_schedule()))
    }

    pub async fn delete_schedule_impl(&self, id: i64) -> Result<bool> {
        let result = Schedules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
