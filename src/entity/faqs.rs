//! FAQ 实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "faqs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub audience: String,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_faq(self) -> crate::models::faqs::entities::Faq {
        use super::to_datetime;
        use crate::models::faqs::entities::{Audience, Faq};

        Faq {
            id: self.id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            audience: self.audience.parse::<Audience>().unwrap_or(Audience::All),
            is_published: self.is_published,
            sort_order: self.sort_order,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
