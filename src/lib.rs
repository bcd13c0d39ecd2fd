//! 校园教务后台
//!
//! 请求依次经过 `middlewares`（JWT、角色、限流）→ `routes`（路径与参数提取）
//! → `services`（权限与业务规则）→ `storage`（SeaORM 持久化，多表写入走事务）。
//!
//! 学期、院系、课程、选课、课表、作业与成绩、考试安排、公告、FAQ、
//! 课代表与课程聊天都挂在 `/api` 下；`/api/admin` 仅管理员可用，
//! `/api/lecturer` 与 `/api/student` 分别是讲师和学生门户。

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
