use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime};

pub async fn dashboard_stats(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let mut stats = storage.dashboard_stats().await?;

    if let Some(start) = request.app_data::<web::Data<AppStartTime>>() {
        stats.uptime_seconds = chrono::Utc::now()
            .signed_duration_since(start.start_datetime)
            .num_seconds();
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "Statistics retrieved")))
}
