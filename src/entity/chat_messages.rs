//! 课程聊天消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub sender_id: i64,
    pub sender_role: String,
    pub content: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self, sender_name: String) -> crate::models::course_reps::entities::ChatMessage {
        use super::to_datetime;
        use crate::models::users::entities::UserRole;

        crate::models::course_reps::entities::ChatMessage {
            id: self.id,
            course_id: self.course_id,
            sender_id: self.sender_id,
            sender_name,
            sender_role: self.sender_role.parse::<UserRole>().unwrap_or(UserRole::Student),
            content: self.content,
            created_at: to_datetime(self.created_at),
        }
    }
}
