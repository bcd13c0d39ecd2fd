/*!
 * JWT 认证中间件
 *
 * 校验 Access Token，加载当前用户并放入请求扩展，供后续中间件与处理程序读取。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses));
 * ```
 *
 * 处理程序中读取当前用户：
 *
 * ```rust,ignore
 * let user = RequireJWT::extract_user_claims(&req);
 * ```
 *
 * ## 认证流程
 *
 * 1. 从 `Authorization: Bearer <token>` 头或 `token` Cookie 中读取令牌，头优先
 * 2. 校验签名、过期时间与令牌类型（必须为 access）
 * 3. 优先从对象缓存读取 `user:{token}`，未命中时查询数据库并回填
 * 4. 被停用的用户视为未认证
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info, warn};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因，映射为 401 响应
#[derive(Debug)]
enum AuthFailure {
    MissingToken,
    InvalidToken,
    UserNotFound,
    Inactive,
    Internal(String),
}

impl AuthFailure {
    fn response_parts(&self) -> (StatusCode, ErrorCode, &'static str) {
        match self {
            AuthFailure::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentication required",
            ),
            AuthFailure::InvalidToken | AuthFailure::UserNotFound => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Invalid or expired token",
            ),
            AuthFailure::Inactive => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::AccountInactive,
                "Account is deactivated",
            ),
            AuthFailure::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Authentication service unavailable",
            ),
        }
    }
}

/// 用户缓存键
pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token =
        JwtUtils::extract_access_token(req.request()).ok_or(AuthFailure::MissingToken)?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::InvalidToken
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    let cache_key = user_cache_key(&token);
    if let Some(ref cache) = cache
        && let CacheResult::Found(user) = cache.get_json::<User>(&cache_key).await
    {
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("storage is not registered".to_string()))?;

    let user_id = claims.user_id().map_err(|_| AuthFailure::InvalidToken)?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?
        .ok_or(AuthFailure::UserNotFound)?;

    if !user.is_active {
        return Err(AuthFailure::Inactive);
    }

    if let Some(cache) = cache {
        cache
            .insert_json(cache_key, &user, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    if let AuthFailure::Internal(ref detail) = failure {
                        warn!("Authentication error on {}: {}", req.path(), detail);
                    } else {
                        info!(
                            "JWT authentication failed for request to {}: {:?}",
                            req.path(),
                            failure
                        );
                    }
                    let (status, code, message) = failure.response_parts();
                    Ok(req.into_response(
                        create_error_response(status, code, message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_status_mapping() {
        assert_eq!(
            AuthFailure::MissingToken.response_parts().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthFailure::Inactive.response_parts().1,
            ErrorCode::AccountInactive
        );
        assert_eq!(
            AuthFailure::Internal("x".into()).response_parts().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_cache_key() {
        assert_eq!(user_cache_key("abc"), "user:abc");
    }
}
