use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (键, 默认值, 类型, 说明)，键与服务端 `KnownSettingKey` 对应
const DEFAULT_SETTINGS: &[(&str, &str, &str, &str)] = &[
    ("app.system_name", "校园教务管理系统", "string", "系统名称"),
    ("jwt.access_token_expiry", "60", "integer", "访问令牌有效期（分钟）"),
    ("jwt.refresh_token_expiry", "7", "integer", "刷新令牌有效期（天）"),
    (
        "jwt.refresh_token_remember_me_expiry",
        "30",
        "integer",
        "勾选记住我时刷新令牌有效期（天）",
    ),
    (
        "enrollment.strict_status_transitions",
        "false",
        "boolean",
        "修改选课状态时是否校验状态流转",
    ),
    ("enrollment.allow_self_enroll", "true", "boolean", "学生能否自行选课"),
    ("chat.max_message_length", "2000", "integer", "课程聊天单条消息字数上限"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SystemSettings::Key).string().not_null().primary_key())
                    .col(ColumnDef::new(SystemSettings::Value).text().not_null())
                    .col(ColumnDef::new(SystemSettings::ValueType).string().not_null())
                    .col(ColumnDef::new(SystemSettings::Description).text().null())
                    .col(ColumnDef::new(SystemSettings::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(SystemSettings::UpdatedBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // changed_by 不设外键，删除用户后审计记录仍保留
        manager
            .create_table(
                Table::create()
                    .table(SettingsAudit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SettingsAudit::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SettingsAudit::SettingKey).string().not_null())
                    .col(ColumnDef::new(SettingsAudit::OldValue).text().null())
                    .col(ColumnDef::new(SettingsAudit::NewValue).text().not_null())
                    .col(ColumnDef::new(SettingsAudit::ChangedBy).big_integer().not_null())
                    .col(ColumnDef::new(SettingsAudit::ChangedAt).big_integer().not_null())
                    .col(ColumnDef::new(SettingsAudit::IpAddress).string().null())
                    .to_owned(),
            )
            .await?;

        // 审计列表按 key 过滤、按时间倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_settings_audit_key_time")
                    .table(SettingsAudit::Table)
                    .col(SettingsAudit::SettingKey)
                    .col(SettingsAudit::ChangedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_settings_audit_time")
                    .table(SettingsAudit::Table)
                    .col(SettingsAudit::ChangedAt)
                    .to_owned(),
            )
            .await?;

        seed_defaults(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SettingsAudit::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).if_exists().to_owned())
            .await
    }
}

async fn seed_defaults(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    let mut insert = Query::insert();
    insert.into_table(SystemSettings::Table).columns([
        SystemSettings::Key,
        SystemSettings::Value,
        SystemSettings::ValueType,
        SystemSettings::Description,
        SystemSettings::UpdatedAt,
    ]);
    for (key, value, value_type, description) in DEFAULT_SETTINGS {
        insert.values_panic([
            (*key).into(),
            (*value).into(),
            (*value_type).into(),
            (*description).into(),
            now.into(),
        ]);
    }
    manager.exec_stmt(insert).await
}

#[derive(DeriveIden)]
enum SystemSettings {
    #[sea_orm(iden = "system_settings")]
    Table,
    Key,
    Value,
    ValueType,
    Description,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum SettingsAudit {
    #[sea_orm(iden = "system_settings_audit")]
    Table,
    Id,
    SettingKey,
    OldValue,
    NewValue,
    ChangedBy,
    ChangedAt,
    IpAddress,
}
