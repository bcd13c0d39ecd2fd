pub mod settings;
pub mod settings_cache;
pub mod stats;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::system::requests::{SettingAuditParams, UpdateSettingRequest};

super::declare_service!(SystemService);

impl SystemService {
    // 公开系统信息
    pub async fn get_info(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_info(self, request).await
    }

    pub async fn list_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::list_settings(self, request).await
    }

    // 更新配置并写入审计日志
    pub async fn update_setting(
        &self,
        key: String,
        body: UpdateSettingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, key, body, request).await
    }

    pub async fn list_audits(
        &self,
        query: SettingAuditParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::list_audits(self, query, request).await
    }

    pub async fn dashboard_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::dashboard_stats(self, request).await
    }
}
