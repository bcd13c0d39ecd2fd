//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department: String,
    pub college: String,
    pub credits: i32,
    pub capacity: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_lecturers::Entity")]
    CourseLecturers,
    #[sea_orm(has_many = "super::course_students::Entity")]
    CourseStudents,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::exam_sessions::Entity")]
    ExamSessions,
}

impl Related<super::course_lecturers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseLecturers.def()
    }
}

impl Related<super::course_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseStudents.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::exam_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamSessions.def()
    }
}

// 讲师经 course_lecturers 关联
impl Related<super::lecturers::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_lecturers::Relation::Lecturer.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::course_lecturers::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> crate::models::courses::entities::Course {
        use super::to_datetime;

        crate::models::courses::entities::Course {
            id: self.id,
            code: self.code,
            title: self.title,
            description: self.description,
            department: self.department,
            college: self.college,
            credits: self.credits,
            capacity: self.capacity,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }

    pub fn summary(&self) -> crate::models::courses::entities::CourseSummary {
        crate::models::courses::entities::CourseSummary {
            id: self.id,
            code: self.code.clone(),
            title: self.title.clone(),
        }
    }
}
