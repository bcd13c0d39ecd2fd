use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicSessionService;
use crate::models::{
    ApiResponse, ErrorCode,
    academic_sessions::{
        entities::{AcademicSessionUpdate, NewAcademicSession},
        requests::{CreateSessionRequest, UpdateSessionRequest, parse_session_range},
    },
};

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SessionNotFound,
        "Academic session not found",
    ))
}

pub async fn list_sessions(
    service: &AcademicSessionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let sessions = storage.list_sessions().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(sessions, "Academic sessions retrieved")))
}

pub async fn current_session(
    service: &AcademicSessionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_current_session().await? {
        Some(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(session, "Current session"))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoActiveSession,
            "No active academic session",
        ))),
    }
}

pub async fn create_session(
    service: &AcademicSessionService,
    body: CreateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Session name is required",
        )));
    }
    let (start_date, end_date) =
        match parse_session_range(body.start_date.as_deref(), body.end_date.as_deref()) {
            Ok(range) => range,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        };

    let storage = service.get_storage(request)?;
    if storage.get_session_by_name(&name).await?.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("Academic session '{name}' already exists"),
        )));
    }

    let session = storage
        .create_session(NewAcademicSession {
            name,
            start_date,
            end_date,
            is_active: body.is_active,
        })
        .await?;
    info!("Academic session {} created", session.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(session, "Academic session created")))
}

pub async fn get_session(
    service: &AcademicSessionService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_session_by_id(id).await? {
        Some(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(session, "Academic session retrieved"))),
        None => Ok(session_not_found()),
    }
}

pub async fn update_session(
    service: &AcademicSessionService,
    id: i64,
    body: UpdateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(existing) = storage.get_session_by_id(id).await? else {
        return Ok(session_not_found());
    };

    let (start_date, end_date) =
        match parse_session_range(body.start_date.as_deref(), body.end_date.as_deref()) {
            Ok(range) => range,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        };

    // 只修改一端时与已有的另一端比较
    let effective_start = start_date.or(existing.start_date.map(|d| d.timestamp()));
    let effective_end = end_date.or(existing.end_date.map(|d| d.timestamp()));
    if let (Some(s), Some(e)) = (effective_start, effective_end)
        && s >= e
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Session start date must be before end date",
        )));
    }

    let name = body.name.map(|n| n.trim().to_string());
    if let Some(ref name) = name {
        if name.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Session name is required",
            )));
        }
        if let Some(other) = storage.get_session_by_name(name).await?
            && other.id != id
        {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::Conflict,
                format!("Academic session '{name}' already exists"),
            )));
        }
    }

    match storage
        .update_session(
            id,
            AcademicSessionUpdate {
                name,
                start_date,
                end_date,
            },
        )
        .await?
    {
        Some(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(session, "Academic session updated"))),
        None => Ok(session_not_found()),
    }
}

pub async fn activate_session(
    service: &AcademicSessionService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.activate_session(id).await? {
        Some(session) => {
            info!("Academic session {} is now current", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(session, "Academic session activated")))
        }
        None => Ok(session_not_found()),
    }
}

pub async fn delete_session(
    service: &AcademicSessionService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_session_by_id(id).await?.is_none() {
        return Ok(session_not_found());
    }

    let references = storage.count_session_references(id).await?;
    if references > 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("Academic session is referenced by {references} enrollment(s) or timetable(s)"),
        )));
    }

    if storage.delete_session(id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Academic session deleted")))
    } else {
        Ok(session_not_found())
    }
}
