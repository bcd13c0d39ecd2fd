use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use tracing::info;

use super::EnrollmentService;
use super::resolve::enroll_one;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, BatchResult, ErrorCode,
    enrollments::{
        entities::{EnrollOptions, Enrollment},
        import::parse_enrollment_csv,
    },
};

/// 读取 multipart 中名为 file 的字段
async fn read_file_from_multipart(
    mut payload: Multipart,
    max_size: usize,
) -> Result<Vec<u8>, HttpResponse> {
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileParseFailed,
                format!("Failed to read upload: {e}"),
            ))
        })?;

        if field.name() != Some("file") {
            continue;
        }

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ImportFileParseFailed,
                    format!("Failed to read file data: {e}"),
                ))
            })?;
            if file_bytes.len() + data.len() > max_size {
                return Err(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                    ErrorCode::ImportFileDataInvalid,
                    format!("File exceeds the maximum size of {max_size} bytes"),
                )));
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if file_bytes.is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            "No file uploaded, expected a multipart field named 'file'",
        )));
    }

    Ok(file_bytes)
}

pub async fn import_enrollments(
    service: &EnrollmentService,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let data = match read_file_from_multipart(payload, config.server.limits.max_payload_size).await
    {
        Ok(data) => data,
        Err(resp) => return Ok(resp),
    };

    let parsed = match parse_enrollment_csv(&data, config.enrollment.import_max_rows) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    let storage = service.get_storage(request)?;

    // 失败条目以行号标识
    let mut result: BatchResult<Enrollment, usize> = BatchResult::default();
    for row_error in parsed.errors {
        result.push_err(row_error.row, row_error.message);
    }
    for row in parsed.rows {
        match enroll_one(&storage, &row.request, EnrollOptions::default()).await {
            Ok(enrollment) => result.push_ok(enrollment),
            Err(err) => result.push_err(row.row, err.message),
        }
    }
    result.failed.sort_by_key(|f| f.item);

    let summary = result.summary();
    info!("Enrollment import finished: {}", summary);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        format!("Import completed: {summary}"),
    )))
}
