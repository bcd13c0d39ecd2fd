//! 课程、讲师分配与院系存储实现

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::SeaOrmStorage;
use crate::entity::prelude::{
    CourseLecturers, CoursePrerequisites, CourseReps, CourseStudents, Courses,
    Enrollments, Lecturers, Schedules, Students, Users,
};
use crate::entity::{
    announcements, assignments, chat_messages, course_lecturers,
    course_prerequisites, course_reps, course_students, courses, enrollments, exam_invigilators,
    exam_sessions, lecturers, schedules, students, submissions, users,
};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    courses::{
        entities::{
            AssignLecturerOutcome, Course, CourseDetail, CourseStudentSummary, CourseUpdate,
            DepartmentDetail, DepartmentSummary, LecturerSummary, NewCourse,
        },
        requests::CourseListQuery,
    },
    enrollments::entities::EnrollmentStatus,
};
use crate::utils::contains_like;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程，先修关系在同一事务中写入
    pub async fn create_course_impl(&self, course: NewCourse) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let created = courses::ActiveModel {
            code: Set(course.code),
            title: Set(course.title),
            description: Set(course.description),
            department: Set(course.department),
            college: Set(course.college),
            credits: Set(course.credits),
            capacity: Set(course.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建课程失败: {e}")))?;

        replace_prerequisites(&txn, created.id, &course.prerequisite_ids).await?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(courses::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 课程详情
    pub async fn get_course_detail_impl(&self, id: i64) -> Result<Option<CourseDetail>> {
        let Some(course) = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let prerequisite_ids: Vec<i64> = CoursePrerequisites::find()
            .filter(course_prerequisites::Column::CourseId.eq(id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询先修课程失败: {e}")))?
            .into_iter()
            .map(|p| p.prerequisite_id)
            .collect();

        let prerequisites = if prerequisite_ids.is_empty() {
            Vec::new()
        } else {
            Courses::find()
                .filter(courses::Column::Id.is_in(prerequisite_ids))
                .order_by_asc(courses::Column::Code)
                .all(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询先修课程失败: {e}")))?
                .iter()
                .map(|c| c.summary())
                .collect()
        };

        let lecturers = self.list_course_lecturers_impl(id).await?;
        let enrolled_count = self.count_active_enrollments_for_course_impl(id).await?;

        Ok(Some(CourseDetail {
            course: course.into_course(),
            prerequisites,
            lecturers,
            enrolled_count,
        }))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<PaginatedResponse<Course>> {
        let mut select = Courses::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(courses::Column::Code.like(contains_like(search)))
                    .add(courses::Column::Title.like(contains_like(search))),
            );
        }

        if let Some(ref department) = query.department {
            select = select.filter(courses::Column::Department.eq(department.trim()));
        }

        if let Some(ref college) = query.college {
            select = select.filter(courses::Column::College.eq(college.trim()));
        }

        select = select.order_by_asc(courses::Column::Code);

        self.fetch_page(select, query.page, query.size, |m| m.into_course())
            .await
    }

    pub async fn list_courses_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Courses::find()
            .filter(courses::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn find_existing_course_codes_impl(&self, codes: &[String]) -> Result<Vec<String>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let existing = Courses::find()
            .filter(courses::Column::Code.is_in(codes.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程代码失败: {e}")))?;

        Ok(existing.into_iter().map(|c| c.code).collect())
    }

    /// 更新课程，提供 prerequisite_ids 时整体替换先修关系
    pub async fn update_course_impl(&self, id: i64, update: CourseUpdate) -> Result<Option<Course>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Courses::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: courses::ActiveModel = existing.into();
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if update.description.is_some() {
            model.description = Set(update.description);
        }
        if let Some(department) = update.department {
            model.department = Set(department);
        }
        if let Some(college) = update.college {
            model.college = Set(college);
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新课程失败: {e}")))?;

        if let Some(ref prerequisite_ids) = update.prerequisite_ids {
            replace_prerequisites(&txn, id, prerequisite_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_course()))
    }

    /// 删除课程及其全部关联数据
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        delete_course_dependents(&txn, id).await?;

        let result = Courses::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除课程失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_active_enrollments_for_course_impl(&self, course_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计选课失败: {e}")))
    }

    /// 分配讲师；已分配时返回 AlreadyAssigned，不重复写入
    pub async fn assign_lecturer_impl(
        &self,
        course_id: i64,
        lecturer_id: i64,
    ) -> Result<AssignLecturerOutcome> {
        let lecturer = Lecturers::find_by_id(lecturer_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询讲师失败: {e}")))?;
        if lecturer.is_none() {
            return Ok(AssignLecturerOutcome::LecturerNotFound);
        }

        if self.is_lecturer_assigned_impl(course_id, lecturer_id).await? {
            return Ok(AssignLecturerOutcome::AlreadyAssigned);
        }

        course_lecturers::ActiveModel {
            course_id: Set(course_id),
            lecturer_id: Set(lecturer_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("分配讲师失败: {e}")))?;

        Ok(AssignLecturerOutcome::Assigned)
    }

    /// 取消任课并删除该讲师在此课程下的课表
    pub async fn unassign_lecturer_impl(&self, course_id: i64, lecturer_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let result = CourseLecturers::delete_many()
            .filter(course_lecturers::Column::CourseId.eq(course_id))
            .filter(course_lecturers::Column::LecturerId.eq(lecturer_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("取消任课失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        Schedules::delete_many()
            .filter(schedules::Column::CourseId.eq(course_id))
            .filter(schedules::Column::LecturerId.eq(lecturer_id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除课表失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn is_lecturer_assigned_impl(&self, course_id: i64, lecturer_id: i64) -> Result<bool> {
        let count = CourseLecturers::find()
            .filter(course_lecturers::Column::CourseId.eq(course_id))
            .filter(course_lecturers::Column::LecturerId.eq(lecturer_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询任课关系失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_course_lecturer_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        let rows = CourseLecturers::find()
            .filter(course_lecturers::Column::CourseId.eq(course_id))
            .order_by_asc(course_lecturers::Column::AssignedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询任课关系失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.lecturer_id).collect())
    }

    pub async fn list_course_lecturers_impl(&self, course_id: i64) -> Result<Vec<LecturerSummary>> {
        let ids = self.list_course_lecturer_ids_impl(course_id).await?;
        lecturer_summaries(&self.db, Condition::all().add(lecturers::Column::Id.is_in(ids))).await
    }

    pub async fn list_lecturer_course_ids_impl(&self, lecturer_id: i64) -> Result<Vec<i64>> {
        let rows = CourseLecturers::find()
            .filter(course_lecturers::Column::LecturerId.eq(lecturer_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询任课关系失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.course_id).collect())
    }

    pub async fn list_courses_for_lecturer_impl(&self, lecturer_id: i64) -> Result<Vec<Course>> {
        let ids = self.list_lecturer_course_ids_impl(lecturer_id).await?;
        self.list_courses_by_ids_impl(&ids).await
    }

    pub async fn count_courses_for_lecturer_impl(&self, lecturer_id: i64) -> Result<u64> {
        CourseLecturers::find()
            .filter(course_lecturers::Column::LecturerId.eq(lecturer_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计任课关系失败: {e}")))
    }

    /// 课程学生名单（以课程学生关联为准）
    pub async fn list_course_students_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseStudentSummary>> {
        let student_ids: Vec<i64> = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课程学生失败: {e}")))?
            .into_iter()
            .map(|r| r.student_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .order_by_asc(students::Column::MatricNumber)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        let user_map = load_users(&self.db, profiles.iter().map(|p| p.user_id)).await?;

        Ok(profiles
            .into_iter()
            .filter_map(|p| {
                let user = user_map.get(&p.user_id)?;
                Some(CourseStudentSummary {
                    student_id: p.id,
                    user_id: p.user_id,
                    full_name: user.full_name.clone(),
                    email: user.email.clone(),
                    matric_number: p.matric_number,
                    level: p.level,
                })
            })
            .collect())
    }

    /// 院系列表，来源于课程与讲师档案中的院系名
    pub async fn list_departments_impl(&self) -> Result<Vec<DepartmentSummary>> {
        let course_rows: Vec<(String, String)> = Courses::find()
            .select_only()
            .column(courses::Column::Department)
            .column(courses::Column::College)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询院系失败: {e}")))?;

        let lecturer_rows: Vec<(String, String)> = Lecturers::find()
            .select_only()
            .column(lecturers::Column::Department)
            .column(lecturers::Column::College)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询院系失败: {e}")))?;

        let mut departments: BTreeMap<String, (BTreeSet<String>, u64)> = BTreeMap::new();
        for (department, college) in course_rows {
            let entry = departments.entry(department).or_default();
            entry.0.insert(college);
            entry.1 += 1;
        }
        for (department, college) in lecturer_rows {
            departments.entry(department).or_default().0.insert(college);
        }

        Ok(departments
            .into_iter()
            .map(|(department, (colleges, course_count))| DepartmentSummary {
                department,
                colleges: colleges.into_iter().collect(),
                course_count,
            })
            .collect())
    }

    pub async fn get_department_impl(&self, name: &str) -> Result<Option<DepartmentDetail>> {
        let name = name.trim();

        let course_models = Courses::find()
            .filter(courses::Column::Department.eq(name))
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询院系课程失败: {e}")))?;

        let lecturers = lecturer_summaries(
            &self.db,
            Condition::all().add(lecturers::Column::Department.eq(name)),
        )
        .await?;

        if course_models.is_empty() && lecturers.is_empty() {
            return Ok(None);
        }

        Ok(Some(DepartmentDetail {
            department: name.to_string(),
            courses: course_models.into_iter().map(|m| m.into_course()).collect(),
            lecturers,
        }))
    }
}

/// 整体替换课程的先修关系（去重并忽略自身）
async fn replace_prerequisites<C: ConnectionTrait>(
    conn: &C,
    course_id: i64,
    prerequisite_ids: &[i64],
) -> Result<()> {
    CoursePrerequisites::delete_many()
        .filter(course_prerequisites::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("清除先修课程失败: {e}")))?;

    let unique: BTreeSet<i64> = prerequisite_ids
        .iter()
        .copied()
        .filter(|id| *id != course_id)
        .collect();

    for prerequisite_id in unique {
        course_prerequisites::ActiveModel {
            course_id: Set(course_id),
            prerequisite_id: Set(prerequisite_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("写入先修课程失败: {e}")))?;
    }

    Ok(())
}

/// 删除课程下的所有关联数据（不含课程本身）
async fn delete_course_dependents<C: ConnectionTrait>(conn: &C, course_id: i64) -> Result<()> {
    let assignment_ids: Vec<i64> = crate::entity::prelude::Assignments::find()
        .filter(assignments::Column::CourseId.eq(course_id))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询作业失败: {e}")))?
        .into_iter()
        .map(|a| a.id)
        .collect();

    if !assignment_ids.is_empty() {
        crate::entity::prelude::Submissions::delete_many()
            .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
            .exec(conn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除提交失败: {e}")))?;
    }

    crate::entity::prelude::Assignments::delete_many()
        .filter(assignments::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除作业失败: {e}")))?;

    let exam_session_ids: Vec<i64> = crate::entity::prelude::ExamSessions::find()
        .filter(exam_sessions::Column::CourseId.eq(course_id))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询考试场次失败: {e}")))?
        .into_iter()
        .map(|s| s.id)
        .collect();

    if !exam_session_ids.is_empty() {
        crate::entity::prelude::ExamInvigilators::delete_many()
            .filter(exam_invigilators::Column::ExamSessionId.is_in(exam_session_ids.clone()))
            .exec(conn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除监考安排失败: {e}")))?;
        crate::entity::prelude::ExamSessions::delete_many()
            .filter(exam_sessions::Column::Id.is_in(exam_session_ids))
            .exec(conn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除考试场次失败: {e}")))?;
    }

    crate::entity::prelude::Announcements::delete_many()
        .filter(announcements::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除课程公告失败: {e}")))?;

    crate::entity::prelude::ChatMessages::delete_many()
        .filter(chat_messages::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除课程聊天失败: {e}")))?;

    CourseReps::delete_many()
        .filter(course_reps::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除课代表失败: {e}")))?;

    Schedules::delete_many()
        .filter(schedules::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除课表失败: {e}")))?;

    Enrollments::delete_many()
        .filter(enrollments::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除选课失败: {e}")))?;

    CourseStudents::delete_many()
        .filter(course_students::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除课程学生失败: {e}")))?;

    CourseLecturers::delete_many()
        .filter(course_lecturers::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除任课关系失败: {e}")))?;

    CoursePrerequisites::delete_many()
        .filter(
            Condition::any()
                .add(course_prerequisites::Column::CourseId.eq(course_id))
                .add(course_prerequisites::Column::PrerequisiteId.eq(course_id)),
        )
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除先修关系失败: {e}")))?;

    Ok(())
}

/// 按条件查询讲师并拼接用户信息
async fn lecturer_summaries<C: ConnectionTrait>(
    conn: &C,
    condition: Condition,
) -> Result<Vec<LecturerSummary>> {
    let profiles = Lecturers::find()
        .filter(condition)
        .order_by_asc(lecturers::Column::StaffId)
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询讲师失败: {e}")))?;

    let user_map = load_users(conn, profiles.iter().map(|p| p.user_id)).await?;

    Ok(profiles
        .into_iter()
        .filter_map(|p| {
            let user = user_map.get(&p.user_id)?;
            Some(LecturerSummary {
                lecturer_id: p.id,
                user_id: p.user_id,
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                staff_id: p.staff_id,
                department: p.department,
            })
        })
        .collect())
}

/// 按 ID 批量加载用户
pub(super) async fn load_users<C: ConnectionTrait>(
    conn: &C,
    ids: impl Iterator<Item = i64>,
) -> Result<HashMap<i64, users::Model>> {
    let ids: Vec<i64> = ids.collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Users::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

