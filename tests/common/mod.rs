//! 集成测试共用的夹具：内存 SQLite 存储、用户与令牌

#![allow(dead_code)]

use std::sync::Arc;

use campus_admin::models::academic_sessions::entities::{AcademicSession, NewAcademicSession};
use campus_admin::models::courses::entities::{Course, NewCourse};
use campus_admin::models::users::entities::{
    LecturerProfile, LecturerProfileInput, NewUser, ProfileInput, StudentProfile,
    StudentProfileInput, User, UserRole,
};
use campus_admin::storage::Storage;
use campus_admin::storage::sea_orm_storage::SeaOrmStorage;
use campus_admin::utils::jwt::JwtUtils;
use campus_admin::utils::password::hash_password;
use sea_orm::{ConnectOptions, Database};

/// 内存库只能有一个连接，否则每个连接各自是一个空库
pub async fn memory_storage() -> Arc<dyn Storage> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    let storage = SeaOrmStorage::from_connection(db)
        .await
        .expect("run migrations");
    Arc::new(storage)
}

fn new_user(name: &str, email: &str, role: UserRole) -> NewUser {
    NewUser {
        full_name: name.to_string(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        role,
        is_active: true,
        must_change_password: false,
    }
}

pub async fn admin(storage: &Arc<dyn Storage>) -> User {
    storage
        .create_user(new_user("Admin", "admin@campus.test", UserRole::Admin), None)
        .await
        .expect("create admin")
        .user
}

/// 带真实密码哈希的管理员，用于走登录流程
pub async fn admin_with_password(storage: &Arc<dyn Storage>, email: &str, password: &str) -> User {
    let mut user = new_user("Registrar", email, UserRole::Admin);
    user.password_hash = hash_password(password).expect("hash password");
    storage
        .create_user(user, None)
        .await
        .expect("create admin")
        .user
}

pub async fn student(storage: &Arc<dyn Storage>, matric: &str) -> (User, StudentProfile) {
    let created = storage
        .create_user(
            new_user(
                &format!("Student {matric}"),
                &format!("{}@campus.test", matric.to_ascii_lowercase()),
                UserRole::Student,
            ),
            Some(ProfileInput::Student(StudentProfileInput {
                matric_number: matric.to_string(),
                program: "Computer Science".to_string(),
                department: "Computer Science".to_string(),
                level: Some(200),
            })),
        )
        .await
        .expect("create student");
    (created.user, created.student.expect("student profile"))
}

pub async fn lecturer(storage: &Arc<dyn Storage>, staff_id: &str) -> (User, LecturerProfile) {
    let created = storage
        .create_user(
            new_user(
                &format!("Lecturer {staff_id}"),
                &format!("{}@campus.test", staff_id.to_ascii_lowercase()),
                UserRole::Lecturer,
            ),
            Some(ProfileInput::Lecturer(LecturerProfileInput {
                staff_id: staff_id.to_string(),
                department: "Computer Science".to_string(),
                college: "Science".to_string(),
            })),
        )
        .await
        .expect("create lecturer");
    (created.user, created.lecturer.expect("lecturer profile"))
}

pub async fn current_session(storage: &Arc<dyn Storage>) -> AcademicSession {
    storage
        .create_session(NewAcademicSession {
            name: "2025/2026".to_string(),
            start_date: None,
            end_date: None,
            is_active: true,
        })
        .await
        .expect("create session")
}

pub async fn course(storage: &Arc<dyn Storage>, code: &str, capacity: i32) -> Course {
    storage
        .create_course(NewCourse {
            code: code.to_string(),
            title: format!("Course {code}"),
            description: None,
            department: "Computer Science".to_string(),
            college: "Science".to_string(),
            credits: 3,
            capacity,
            prerequisite_ids: Vec::new(),
        })
        .await
        .expect("create course")
}

pub fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string(), None)
        .expect("sign token");
    ("Authorization", format!("Bearer {token}"))
}

/// 以给定存储构建挂载全部路由的测试服务
#[macro_export]
macro_rules! test_app {
    ($storage:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($storage.clone()))
                .configure(campus_admin::routes::configure_api_routes),
        )
        .await
    };
}
