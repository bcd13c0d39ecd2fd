//! 仪表盘统计

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use super::SeaOrmStorage;
use crate::entity::prelude::{
    Announcements, Assignments, Courses, Enrollments, ExamTimetables, Schedules, Submissions,
    Users,
};
use crate::entity::{courses, enrollments, exam_timetables, submissions, users};
use crate::errors::{CampusError, Result};
use crate::models::{
    assignments::entities::SubmissionStatus, enrollments::entities::EnrollmentStatus,
    system::responses::DashboardStats, users::entities::UserRole,
};

impl SeaOrmStorage {
    pub(crate) async fn dashboard_stats_impl(&self) -> Result<DashboardStats> {
        let map_err = |e: sea_orm::DbErr| CampusError::database_operation(format!("统计失败: {e}"));

        let total_users = Users::find().count(&self.db).await.map_err(map_err)?;
        let admins = self.count_users_by_role_impl(&UserRole::Admin).await?;
        let lecturers = self.count_users_by_role_impl(&UserRole::Lecturer).await?;
        let students = self.count_users_by_role_impl(&UserRole::Student).await?;
        let inactive_users = Users::find()
            .filter(users::Column::IsActive.eq(false))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        let courses = Courses::find().count(&self.db).await.map_err(map_err)?;
        let departments: Vec<String> = Courses::find()
            .select_only()
            .column(courses::Column::Department)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_err)?;

        let active_enrollments = Enrollments::find()
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        let schedules = Schedules::find().count(&self.db).await.map_err(map_err)?;
        let assignments = Assignments::find().count(&self.db).await.map_err(map_err)?;
        let pending_grading = Submissions::find()
            .filter(submissions::Column::Status.is_in([
                SubmissionStatus::Submitted.as_str(),
                SubmissionStatus::Late.as_str(),
            ]))
            .count(&self.db)
            .await
            .map_err(map_err)?;

        let published_timetables = ExamTimetables::find()
            .filter(exam_timetables::Column::IsPublished.eq(true))
            .count(&self.db)
            .await
            .map_err(map_err)?;
        let announcements = Announcements::find().count(&self.db).await.map_err(map_err)?;

        let current_session = self.get_current_session_impl().await?.map(|s| s.name);

        Ok(DashboardStats {
            total_users,
            admins,
            lecturers,
            students,
            inactive_users,
            courses,
            departments: departments.len() as u64,
            active_enrollments,
            schedules,
            assignments,
            pending_grading,
            published_timetables,
            announcements,
            current_session,
            uptime_seconds: 0,
        })
    }
}
