use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,    // 管理员
    Lecturer, // 讲师
    Student,  // 学生
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const LECTURER: &'static str = "lecturer";
    pub const STUDENT: &'static str = "student";
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, lecturer, student"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Lecturer => write!(f, "{}", UserRole::LECTURER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::LECTURER => Ok(UserRole::Lecturer),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub must_change_password: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 学生档案，与学生用户一一对应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub matric_number: String,
    pub program: String,
    pub department: String,
    pub level: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 讲师档案，与讲师用户一一对应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerProfile {
    pub id: i64,
    pub user_id: i64,
    pub staff_id: String,
    pub department: String,
    pub college: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户及其角色档案
#[derive(Debug, Clone, Serialize)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecturer: Option<LecturerProfile>,
}

/// 学生档案输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfileInput {
    pub matric_number: String,
    pub program: String,
    pub department: String,
    pub level: Option<i32>,
}

/// 讲师档案输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerProfileInput {
    pub staff_id: String,
    pub department: String,
    pub college: String,
}

/// 写入存储层的角色档案
#[derive(Debug, Clone)]
pub enum ProfileInput {
    Student(StudentProfileInput),
    Lecturer(LecturerProfileInput),
}

impl ProfileInput {
    pub fn role(&self) -> UserRole {
        match self {
            ProfileInput::Student(_) => UserRole::Student,
            ProfileInput::Lecturer(_) => UserRole::Lecturer,
        }
    }

    /// 按角色从请求中挑选档案，管理员没有档案
    pub fn for_role(
        role: &UserRole,
        student: Option<StudentProfileInput>,
        lecturer: Option<LecturerProfileInput>,
    ) -> Result<Option<Self>, &'static str> {
        match role {
            UserRole::Admin => Ok(None),
            UserRole::Student => student
                .map(|p| Some(ProfileInput::Student(p)))
                .ok_or("Student profile (matric_number, program, department) is required"),
            UserRole::Lecturer => lecturer
                .map(|p| Some(ProfileInput::Lecturer(p)))
                .ok_or("Lecturer profile (staff_id, department, college) is required"),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        use crate::utils::validate::{validate_matric_number, validate_staff_id};
        match self {
            ProfileInput::Student(p) => {
                validate_matric_number(&p.matric_number)?;
                if p.program.trim().is_empty() || p.department.trim().is_empty() {
                    return Err("Program and department are required");
                }
                if let Some(level) = p.level
                    && !(100..=900).contains(&level)
                {
                    return Err("Level must be between 100 and 900");
                }
                Ok(())
            }
            ProfileInput::Lecturer(p) => {
                validate_staff_id(&p.staff_id)?;
                if p.department.trim().is_empty() || p.college.trim().is_empty() {
                    return Err("Department and college are required");
                }
                Ok(())
            }
        }
    }
}

/// 新用户（存储层输入）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub must_change_password: bool,
}

/// 用户更新（存储层输入），None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub must_change_password: Option<bool>,
    pub profile: Option<ProfileInput>,
}

/// 阻止删除用户的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDeleteBlocker {
    LastAdmin,
    ActiveEnrollments(u64),
    AssignedCourses(u64),
}

impl UserDeleteBlocker {
    /// 根据依赖计数判断能否删除
    pub fn check(
        role: &UserRole,
        admin_count: u64,
        active_enrollments: u64,
        assigned_courses: u64,
    ) -> Option<Self> {
        match role {
            UserRole::Admin if admin_count <= 1 => Some(Self::LastAdmin),
            UserRole::Student if active_enrollments > 0 => {
                Some(Self::ActiveEnrollments(active_enrollments))
            }
            UserRole::Lecturer if assigned_courses > 0 => {
                Some(Self::AssignedCourses(assigned_courses))
            }
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::LastAdmin => "Cannot delete the last admin account".to_string(),
            Self::ActiveEnrollments(n) => {
                format!("Student still has {n} active enrollment(s)")
            }
            Self::AssignedCourses(n) => format!("Lecturer is still assigned to {n} course(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("lecturer".parse::<UserRole>().unwrap(), UserRole::Lecturer);
        assert!("professor".parse::<UserRole>().is_err());
        let role: UserRole = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role.to_string(), "student");
    }

    #[test]
    fn test_delete_blockers() {
        assert_eq!(
            UserDeleteBlocker::check(&UserRole::Admin, 1, 0, 0),
            Some(UserDeleteBlocker::LastAdmin)
        );
        assert_eq!(UserDeleteBlocker::check(&UserRole::Admin, 2, 0, 0), None);
        assert_eq!(
            UserDeleteBlocker::check(&UserRole::Student, 1, 2, 0),
            Some(UserDeleteBlocker::ActiveEnrollments(2))
        );
        assert_eq!(
            UserDeleteBlocker::check(&UserRole::Lecturer, 1, 0, 1),
            Some(UserDeleteBlocker::AssignedCourses(1))
        );
        assert_eq!(UserDeleteBlocker::check(&UserRole::Student, 1, 0, 3), None);
    }

    #[test]
    fn test_profile_for_role() {
        let student = StudentProfileInput {
            matric_number: "CSC/2021/001".into(),
            program: "Computer Science".into(),
            department: "Computing".into(),
            level: Some(300),
        };
        assert!(ProfileInput::for_role(&UserRole::Admin, None, None).unwrap().is_none());
        assert!(ProfileInput::for_role(&UserRole::Lecturer, Some(student.clone()), None).is_err());
        let profile = ProfileInput::for_role(&UserRole::Student, Some(student), None)
            .unwrap()
            .unwrap();
        assert_eq!(profile.role(), UserRole::Student);
        assert!(profile.validate().is_ok());
    }
}
