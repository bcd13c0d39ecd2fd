use super::SeaOrmStorage;
use crate::entity::faqs::{ActiveModel, Column};
use crate::entity::prelude::Faqs;
use crate::errors::{CampusError, Result};
use crate::models::faqs::entities::{Faq, FaqFilter, FaqUpdate, NewFaq};
use crate::utils::contains_like;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_faq_impl(&self, faq: NewFaq) -> Result<Faq> {
        let now = chrono::Utc::now().timestamp();

        let created = ActiveModel {
            question: Set(faq.question),
            answer: Set(faq.answer),
            category: Set(faq.category),
            audience: Set(faq.audience.as_str().to_string()),
            is_published: Set(faq.is_published),
            sort_order: Set(faq.sort_order),
            created_by: Set(faq.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建FAQ失败: {e}")))?;

        Ok(created.into_faq())
    }

    pub async fn get_faq_by_id_impl(&self, id: i64) -> Result<Option<Faq>> {
        let result = Faqs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询FAQ失败: {e}")))?;

        Ok(result.map(|m| m.into_faq()))
    }

    /// 按分类与排序号排列
    pub async fn list_faqs_impl(&self, filter: FaqFilter) -> Result<Vec<Faq>> {
        let mut select = Faqs::find();

        if let Some(audiences) = filter.audiences {
            select = select.filter(
                Column::Audience.is_in(audiences.iter().map(|a| a.as_str()).collect::<Vec<_>>()),
            );
        }
        if filter.published_only {
            select = select.filter(Column::IsPublished.eq(true));
        }
        if let Some(ref category) = filter.category {
            select = select.filter(Column::Category.eq(category.trim()));
        }
        if let Some(ref search) = filter.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Question.like(contains_like(search)))
                    .add(Column::Answer.like(contains_like(search))),
            );
        }

        let rows = select
            .order_by_asc(Column::Category)
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询FAQ失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_faq()).collect())
    }

    pub async fn update_faq_impl(&self, id: i64, update: FaqUpdate) -> Result<Option<Faq>> {
        let Some(existing) = Faqs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询FAQ失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(question) = update.question {
            model.question = Set(question);
        }
        if let Some(answer) = update.answer {
            model.answer = Set(answer);
        }
        if update.category.is_some() {
            model.category = Set(update.category);
        }
        if let Some(audience) = update.audience {
            model.audience = Set(audience.as_str().to_string());
        }
        if let Some(is_published) = update.is_published {
            model.is_published = Set(is_published);
        }
        if let Some(sort_order) = update.sort_order {
            model.sort_order = Set(sort_order);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新FAQ失败: {e}")))?;

        Ok(Some(updated.into_faq()))
    }

    pub async fn delete_faq_impl(&self, id: i64) -> Result<bool> {
        let result = Faqs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除FAQ失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
