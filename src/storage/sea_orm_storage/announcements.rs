use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column};
use crate::entity::prelude::Announcements;
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    announcements::entities::{
        Announcement, AnnouncementUpdate, AnnouncementVisibility, NewAnnouncement,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        announcement: NewAnnouncement,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let created = ActiveModel {
            title: Set(announcement.title),
            content: Set(announcement.content),
            audience: Set(announcement.audience.as_str().to_string()),
            course_id: Set(announcement.course_id),
            created_by: Set(announcement.created_by),
            is_pinned: Set(announcement.is_pinned),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(created.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    /// 按可见范围分页，置顶优先，其次按发布时间倒序
    pub async fn list_announcements_with_pagination_impl(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<Announcement>> {
        let mut select = Announcements::find();

        if let Some(audiences) = visibility.audiences {
            select = select.filter(
                Column::Audience.is_in(audiences.iter().map(|a| a.as_str()).collect::<Vec<_>>()),
            );
        }

        // 课程公告只对课程成员可见
        if let Some(course_ids) = visibility.course_ids {
            select = select.filter(
                Condition::any()
                    .add(Column::CourseId.is_null())
                    .add(Column::CourseId.is_in(course_ids)),
            );
        }

        select = select
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::CreatedAt);

        self.fetch_page(select, page, size, |m| m.into_announcement())
            .await
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: AnnouncementUpdate,
    ) -> Result<Option<Announcement>> {
        let Some(existing) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(audience) = update.audience {
            model.audience = Set(audience.as_str().to_string());
        }
        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(is_pinned) = update.is_pinned {
            model.is_pinned = Set(is_pinned);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(Some(updated.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
