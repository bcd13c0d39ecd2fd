//! 考试场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timetable_id: i64,
    pub course_id: i64,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_timetables::Entity",
        from = "Column::TimetableId",
        to = "super::exam_timetables::Column::Id"
    )]
    Timetable,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::exam_invigilators::Entity")]
    Invigilators,
}

impl Related<super::exam_timetables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timetable.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::exam_invigilators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invigilators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装业务模型，课程信息与监考讲师由调用方查询后传入
    pub fn into_exam_session(
        self,
        course: Option<&super::courses::Model>,
        invigilator_ids: Vec<i64>,
    ) -> crate::models::timetables::entities::ExamSession {
        crate::models::timetables::entities::ExamSession {
            id: self.id,
            timetable_id: self.timetable_id,
            course_id: self.course_id,
            course_code: course.map(|c| c.code.clone()).unwrap_or_default(),
            course_title: course.map(|c| c.title.clone()).unwrap_or_default(),
            exam_date: self.exam_date,
            start_time: self.start_time,
            end_time: self.end_time,
            venue: self.venue,
            invigilator_ids,
        }
    }
}
