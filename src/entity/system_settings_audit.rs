//! 设置变更审计，每次修改写一行

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::system::entities::SettingAudit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings_audit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: i64,
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::system_settings::Entity",
        from = "Column::SettingKey",
        to = "super::system_settings::Column::Key"
    )]
    Setting,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChangedBy",
        to = "super::users::Column::Id"
    )]
    ChangedBy,
}

impl Related<super::system_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Setting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SettingAudit {
    fn from(row: Model) -> Self {
        SettingAudit {
            id: row.id,
            changed_at: to_datetime(row.changed_at),
            setting_key: row.setting_key,
            old_value: row.old_value,
            new_value: row.new_value,
            changed_by: row.changed_by,
            ip_address: row.ip_address,
        }
    }
}
