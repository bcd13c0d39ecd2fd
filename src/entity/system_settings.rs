//! 运行时可调整的设置项（学期开关、选课开关、聊天限制等）

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::system::entities::{SettingValueType, SystemSetting};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    /// string / integer / boolean / float / json
    pub value_type: String,
    pub description: Option<String>,
    pub updated_at: i64,
    pub updated_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::system_settings_audit::Entity")]
    Audits,
}

impl Related<super::system_settings_audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SystemSetting {
    fn from(row: Model) -> Self {
        // 未知类型按字符串处理，保证旧数据仍可读
        let value_type = row
            .value_type
            .parse::<SettingValueType>()
            .unwrap_or(SettingValueType::String);

        SystemSetting {
            value_type,
            updated_at: to_datetime(row.updated_at),
            key: row.key,
            value: row.value,
            description: row.description,
            updated_by: row.updated_by,
        }
    }
}
