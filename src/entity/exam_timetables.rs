//! 考试时间表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_timetables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub academic_session_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub published_at: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_sessions::Entity",
        from = "Column::AcademicSessionId",
        to = "super::academic_sessions::Column::Id"
    )]
    AcademicSession,
    #[sea_orm(has_many = "super::exam_sessions::Entity")]
    ExamSessions,
}

impl Related<super::academic_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicSession.def()
    }
}

impl Related<super::exam_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_timetable(self) -> crate::models::timetables::entities::ExamTimetable {
        use super::to_datetime;

        crate::models::timetables::entities::ExamTimetable {
            id: self.id,
            academic_session_id: self.academic_session_id,
            title: self.title,
            description: self.description,
            is_published: self.is_published,
            published_at: self.published_at.map(to_datetime),
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
