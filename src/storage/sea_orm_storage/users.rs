use super::SeaOrmStorage;
use crate::entity::prelude::{Lecturers, Students, Users};
use crate::entity::{lecturers, students, users};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    users::{
        entities::{
            LecturerProfile, NewUser, ProfileInput, StudentProfile, User, UserRole, UserUpdate,
            UserWithProfile,
        },
        requests::UserListQuery,
    },
};
use crate::utils::contains_like;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建用户，档案与用户在同一事务中写入
    pub async fn create_user_impl(
        &self,
        user: NewUser,
        profile: Option<ProfileInput>,
    ) -> Result<UserWithProfile> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let model = users::ActiveModel {
            full_name: Set(user.full_name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            is_active: Set(user.is_active),
            must_change_password: Set(user.must_change_password),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建用户失败: {e}")))?;

        let (student, lecturer) = match profile {
            Some(profile) => insert_profile(&txn, created.id, profile, now).await?,
            None => (None, None),
        };

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(UserWithProfile {
            user: created.into_user(),
            student,
            lecturer,
        })
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取用户及其角色档案
    pub async fn get_user_with_profile_impl(&self, id: i64) -> Result<Option<UserWithProfile>> {
        let Some(user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };

        let student = match user.role {
            UserRole::Student => self.get_student_by_user_id_impl(id).await?,
            _ => None,
        };
        let lecturer = match user.role {
            UserRole::Lecturer => self.get_lecturer_by_user_id_impl(id).await?,
            _ => None,
        };

        Ok(Some(UserWithProfile {
            user,
            student,
            lecturer,
        }))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(users::Column::FullName.like(contains_like(search)))
                    .add(users::Column::Email.like(contains_like(search))),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(users::Column::Role.eq(role.to_string()));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(users::Column::IsActive.eq(is_active));
        }

        select = select.order_by_desc(users::Column::CreatedAt);

        self.fetch_page(select, query.page, query.size, |m| m.into_user())
            .await
    }

    /// 更新用户
    ///
    /// 角色变化时删除旧档案并写入新档案；角色不变时更新现有档案。
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UserUpdate,
    ) -> Result<Option<UserWithProfile>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let old_role = existing.role.parse::<UserRole>().unwrap_or(UserRole::Student);
        let new_role = update.role.clone().unwrap_or_else(|| old_role.clone());

        let mut model: users::ActiveModel = existing.into();
        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(must_change_password) = update.must_change_password {
            model.must_change_password = Set(must_change_password);
        }
        model.role = Set(new_role.to_string());
        model.updated_at = Set(now);

        model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新用户失败: {e}")))?;

        if old_role != new_role {
            delete_profiles(&txn, id).await?;
            if let Some(profile) = update.profile {
                insert_profile(&txn, id, profile, now).await?;
            }
        } else if let Some(profile) = update.profile {
            update_profile(&txn, id, profile, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_user_with_profile_impl(id).await
    }

    /// 删除用户，档案及其关联数据随外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        delete_profiles(&txn, id).await?;

        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("删除用户失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(users::Column::LastLogin, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_by_role_impl(&self, role: &UserRole) -> Result<u64> {
        Users::find()
            .filter(users::Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计用户失败: {e}")))
    }

    /// 返回第一个已被其他用户占用的字段名
    pub async fn find_identity_conflict_impl(
        &self,
        email: Option<&str>,
        matric_number: Option<&str>,
        staff_id: Option<&str>,
        exclude_user_id: Option<i64>,
    ) -> Result<Option<&'static str>> {
        let exclude = exclude_user_id.unwrap_or(0);

        if let Some(email) = email {
            let taken = Users::find()
                .filter(users::Column::Email.eq(email))
                .filter(users::Column::Id.ne(exclude))
                .count(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询邮箱失败: {e}")))?;
            if taken > 0 {
                return Ok(Some("email"));
            }
        }

        if let Some(matric_number) = matric_number {
            let taken = Students::find()
                .filter(students::Column::MatricNumber.eq(matric_number))
                .filter(students::Column::UserId.ne(exclude))
                .count(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询学号失败: {e}")))?;
            if taken > 0 {
                return Ok(Some("matric_number"));
            }
        }

        if let Some(staff_id) = staff_id {
            let taken = Lecturers::find()
                .filter(lecturers::Column::StaffId.eq(staff_id))
                .filter(lecturers::Column::UserId.ne(exclude))
                .count(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询工号失败: {e}")))?;
            if taken > 0 {
                return Ok(Some("staff_id"));
            }
        }

        Ok(None)
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<StudentProfile>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_student_by_user_id_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<StudentProfile>> {
        let result = Students::find()
            .filter(students::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_student_by_matric_impl(
        &self,
        matric_number: &str,
    ) -> Result<Option<StudentProfile>> {
        let result = Students::find()
            .filter(students::Column::MatricNumber.eq(matric_number.trim()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_lecturer_by_id_impl(&self, id: i64) -> Result<Option<LecturerProfile>> {
        let result = Lecturers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询讲师失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_lecturer_by_user_id_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<LecturerProfile>> {
        let result = Lecturers::find()
            .filter(lecturers::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询讲师失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }
}

/// 写入角色档案
async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    profile: ProfileInput,
    now: i64,
) -> Result<(Option<StudentProfile>, Option<LecturerProfile>)> {
    match profile {
        ProfileInput::Student(p) => {
            let created = students::ActiveModel {
                user_id: Set(user_id),
                matric_number: Set(p.matric_number.trim().to_string()),
                program: Set(p.program.trim().to_string()),
                department: Set(p.department.trim().to_string()),
                level: Set(p.level),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建学生档案失败: {e}")))?;
            Ok((Some(created.into_profile()), None))
        }
        ProfileInput::Lecturer(p) => {
            let created = lecturers::ActiveModel {
                user_id: Set(user_id),
                staff_id: Set(p.staff_id.trim().to_string()),
                department: Set(p.department.trim().to_string()),
                college: Set(p.college.trim().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| CampusError::database_operation(format!("创建讲师档案失败: {e}")))?;
            Ok((None, Some(created.into_profile())))
        }
    }
}

/// 更新已有档案，不存在时写入
async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    profile: ProfileInput,
    now: i64,
) -> Result<()> {
    match profile {
        ProfileInput::Student(p) => {
            let existing = Students::find()
                .filter(students::Column::UserId.eq(user_id))
                .one(conn)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;
            let Some(existing) = existing else {
                insert_profile(conn, user_id, ProfileInput::Student(p), now).await?;
                return Ok(());
            };
            let mut model: students::ActiveModel = existing.into();
            model.matric_number = Set(p.matric_number.trim().to_string());
            model.program = Set(p.program.trim().to_string());
            model.department = Set(p.department.trim().to_string());
            model.level = Set(p.level);
            model.updated_at = Set(now);
            model
                .update(conn)
                .await
                .map_err(|e| CampusError::database_operation(format!("更新学生档案失败: {e}")))?;
        }
        ProfileInput::Lecturer(p) => {
            let existing = Lecturers::find()
                .filter(lecturers::Column::UserId.eq(user_id))
                .one(conn)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询讲师失败: {e}")))?;
            let Some(existing) = existing else {
                insert_profile(conn, user_id, ProfileInput::Lecturer(p), now).await?;
                return Ok(());
            };
            let mut model: lecturers::ActiveModel = existing.into();
            model.staff_id = Set(p.staff_id.trim().to_string());
            model.department = Set(p.department.trim().to_string());
            model.college = Set(p.college.trim().to_string());
            model.updated_at = Set(now);
            model
                .update(conn)
                .await
                .map_err(|e| CampusError::database_operation(format!("更新讲师档案失败: {e}")))?;
        }
    }
    Ok(())
}

async fn delete_profiles<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<()> {
    Students::delete_many()
        .filter(students::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除学生档案失败: {e}")))?;
    Lecturers::delete_many()
        .filter(lecturers::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("删除讲师档案失败: {e}")))?;
    Ok(())
}
