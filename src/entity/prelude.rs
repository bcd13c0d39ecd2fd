//! 预导入模块，方便使用

pub use super::academic_sessions::{
    ActiveModel as AcademicSessionActiveModel, Entity as AcademicSessions,
    Model as AcademicSessionModel,
};
pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::chat_messages::{
    ActiveModel as ChatMessageActiveModel, Entity as ChatMessages, Model as ChatMessageModel,
};
pub use super::course_lecturers::{
    ActiveModel as CourseLecturerActiveModel, Entity as CourseLecturers,
    Model as CourseLecturerModel,
};
pub use super::course_prerequisites::{
    ActiveModel as CoursePrerequisiteActiveModel, Entity as CoursePrerequisites,
    Model as CoursePrerequisiteModel,
};
pub use super::course_reps::{
    ActiveModel as CourseRepActiveModel, Entity as CourseReps, Model as CourseRepModel,
};
pub use super::course_students::{
    ActiveModel as CourseStudentActiveModel, Entity as CourseStudents, Model as CourseStudentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::exam_invigilators::{
    ActiveModel as ExamInvigilatorActiveModel, Entity as ExamInvigilators,
    Model as ExamInvigilatorModel,
};
pub use super::exam_sessions::{
    ActiveModel as ExamSessionActiveModel, Entity as ExamSessions, Model as ExamSessionModel,
};
pub use super::exam_timetables::{
    ActiveModel as ExamTimetableActiveModel, Entity as ExamTimetables, Model as ExamTimetableModel,
};
pub use super::faqs::{ActiveModel as FaqActiveModel, Entity as Faqs, Model as FaqModel};
pub use super::lecturers::{
    ActiveModel as LecturerActiveModel, Entity as Lecturers, Model as LecturerModel,
};
pub use super::schedules::{
    ActiveModel as ScheduleActiveModel, Entity as Schedules, Model as ScheduleModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Entity as SystemSettings, Model as SystemSettingModel,
};
pub use super::system_settings_audit::{
    ActiveModel as SystemSettingAuditActiveModel, Entity as SystemSettingsAudit,
    Model as SystemSettingAuditModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
