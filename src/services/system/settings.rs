use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{DynamicConfig, SystemService};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::KnownSettingKey,
        requests::{SettingAuditParams, UpdateSettingRequest},
        responses::{AdminSettingsListResponse, SystemInfoResponse},
    },
};
use crate::services::current_user;

/// 公开系统信息，无需登录
pub async fn get_info(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current_session = storage.get_current_session().await?.map(|s| s.name);

    let response = SystemInfoResponse {
        system_name: DynamicConfig::system_name().await,
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: AppConfig::get().app.environment.clone(),
        allow_self_enroll: DynamicConfig::allow_self_enroll().await,
        current_session,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "System info retrieved")))
}

pub async fn list_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let settings = storage.list_all_settings().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AdminSettingsListResponse { settings },
        "Settings retrieved successfully",
    )))
}

pub async fn update_setting(
    service: &SystemService,
    key: String,
    body: UpdateSettingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Ok(known) = key.parse::<KnownSettingKey>() else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SettingNotFound,
            format!("Unknown setting: {key}"),
        )));
    };
    let value = match known.validate_value(&body.raw_value()) {
        Ok(value) => value,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SettingValueInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let ip_address = request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    match storage.update_setting(&key, &value, user.id, ip_address).await? {
        Some(setting) => {
            DynamicConfig::update(&key, &value).await;
            info!("Setting {} changed to '{}' by user {}", key, value, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(setting, "Setting updated successfully")))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SettingNotFound,
            format!("Setting {key} not found"),
        ))),
    }
}

pub async fn list_audits(
    service: &SystemService,
    query: SettingAuditParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();
    let key = query.key_filter();

    let audits = storage.list_setting_audits(key, page, size).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(
        audits.items,
        audits.pagination,
        "Setting audits retrieved successfully",
    )))
}
