//! 系统设置存储实现

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::prelude::{SystemSettings, SystemSettingsAudit};
use crate::entity::{system_settings, system_settings_audit};
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse,
    system::entities::{SettingAudit, SystemSetting},
};

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(system_settings::Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(SystemSetting::from).collect())
    }

    /// 通过 key 获取设置
    pub(crate) async fn get_setting_by_key_impl(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置失败: {e}")))?;

        Ok(setting.map(SystemSetting::from))
    }

    /// 更新设置，设置与审计记录在同一事务中写入
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("获取设置失败: {e}")))?
        else {
            return Ok(None);
        };

        let old_value = existing.value.clone();

        let mut active_model: system_settings::ActiveModel = existing.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.updated_by = Set(Some(user_id));

        let updated = active_model
            .update(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("更新设置失败: {e}")))?;

        system_settings_audit::ActiveModel {
            setting_key: Set(key.to_string()),
            old_value: Set(Some(old_value)),
            new_value: Set(value.to_string()),
            changed_by: Set(user_id),
            changed_at: Set(now),
            ip_address: Set(ip_address),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("创建审计日志失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(SystemSetting::from(updated)))
    }

    /// 获取审计日志，最新在前
    pub(crate) async fn list_setting_audits_impl(
        &self,
        key: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<SettingAudit>> {
        let mut select = SystemSettingsAudit::find();

        if let Some(key) = key {
            select = select.filter(system_settings_audit::Column::SettingKey.eq(key));
        }

        select = select
            .order_by(system_settings_audit::Column::ChangedAt, Order::Desc)
            .order_by(system_settings_audit::Column::Id, Order::Desc);

        self.fetch_page(select, page, size, SettingAudit::from).await
    }
}
