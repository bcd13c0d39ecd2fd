/*!
 * 角色门禁
 *
 * 挂在 `RequireJWT` 内层，按当前用户角色放行，角色不符返回 403。
 * 每个用户只有一个角色，所以这里只判断“是否为该角色”。
 *
 * ```rust,ignore
 * web::scope("/api/admin/courses")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::scope("")
 *             .wrap(RequireRole::new(&UserRole::Admin))
 *             .route("", web::get().to(list_courses)),
 *     )
 * ```
 */

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    role: UserRole,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self { role: role.clone() }
    }
}

/// 角色检查的结论
#[derive(Debug, PartialEq)]
enum Gate {
    Pass,
    WrongRole { user_id: i64, actual: UserRole },
    Anonymous,
}

fn check(user: Option<&User>, required: &UserRole) -> Gate {
    match user {
        Some(user) if &user.role == required => Gate::Pass,
        Some(user) => Gate::WrongRole {
            user_id: user.id,
            actual: user.role.clone(),
        },
        None => Gate::Anonymous,
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            role: self.role.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    role: UserRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let gate = check(req.extensions().get::<User>(), &self.role);

        let response = match gate {
            Gate::Pass => {
                let srv = self.service.clone();
                return Box::pin(async move { Ok(srv.call(req).await?.map_into_left_body()) });
            }
            Gate::WrongRole { user_id, actual } => {
                info!(
                    "User {} ({}) denied on {}, requires {}",
                    user_id,
                    actual,
                    req.path(),
                    self.role
                );
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "You do not have permission to access this resource",
                )
            }
            // RequireJWT 没挂在外层时才会走到这里
            Gate::Anonymous => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentication required",
            ),
        };

        Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as atest, web};

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let app = atest::init_service(
            App::new()
                .wrap(RequireRole::new(&UserRole::Admin))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_anonymous_gate() {
        assert_eq!(check(None, &UserRole::Lecturer), Gate::Anonymous);
    }
}
