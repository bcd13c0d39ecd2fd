/*!
 * 固定窗口限流
 *
 * 已认证请求按用户计数，匿名请求按客户端 IP 计数，窗口内超过上限返回 429，
 * `Retry-After` 为当前窗口剩余秒数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 需要按用户计数时，把 `RequireJWT` 挂在外层作用域上，保证用户先被解析。
 */

use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::Expiry;
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 一个计数窗口
#[derive(Clone, Copy)]
struct Window {
    started: Instant,
    length: Duration,
    hits: u32,
}

impl Window {
    fn remaining(&self, now: Instant) -> Duration {
        self.length.saturating_sub(now.duration_since(self.started))
    }
}

/// 窗口结束时条目随之过期
struct WindowExpiry;

impl Expiry<String, Window> for WindowExpiry {
    fn expire_after_create(&self, _key: &String, window: &Window, _at: Instant) -> Option<Duration> {
        Some(window.length)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        window: &Window,
        updated_at: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        Some(window.remaining(updated_at))
    }
}

const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .expire_after(WindowExpiry)
        .build()
});

struct Policy {
    max_requests: u32,
    window: Duration,
    /// 区分不同端点的计数
    scope: &'static str,
}

#[derive(Clone)]
pub struct RateLimit {
    policy: Arc<Policy>,
}

impl RateLimit {
    pub fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            policy: Arc::new(Policy {
                max_requests,
                window: Duration::from_secs(window_secs),
                scope,
            }),
        }
    }

    /// 5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 学生自助注册，3 次/分钟
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// CSV 选课导入，每个管理员 5 次/分钟
    pub fn bulk_import() -> Self {
        Self::new("enrollment_import", 5, 60)
    }

    /// 课程聊天发言，每人 30 条/分钟
    pub fn chat() -> Self {
        Self::new("chat", 30, 60)
    }
}

/// 连接地址优先，取不到合法 IP 时再看代理头
fn client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req.connection_info().realip_remote_addr().map(str::to_string);
    if let Some(ip) = connection_ip.as_deref().filter(|ip| is_valid_ip(ip)) {
        return ip.to_string();
    }

    let from_header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| is_valid_ip(ip))
            .map(str::to_string)
    };

    from_header("X-Forwarded-For")
        .or_else(|| from_header("X-Real-IP"))
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

fn counter_key(scope: &str, req: &ServiceRequest) -> String {
    // 先释放 extensions 借用，connection_info 需要再次借用
    let user_id = req.extensions().get::<User>().map(|u| u.id);
    match user_id {
        Some(id) => format!("{scope}:user:{id}"),
        None => format!("{scope}:ip:{}", client_ip(req)),
    }
}

/// 计入一次请求；已达上限时返回窗口剩余时间
async fn hit(key: String, policy: &Policy) -> Result<u32, Duration> {
    let now = Instant::now();
    let mut window = match WINDOWS.get(&key).await {
        Some(w) if !w.remaining(now).is_zero() => w,
        _ => Window {
            started: now,
            length: policy.window,
            hits: 0,
        },
    };

    if window.hits >= policy.max_requests {
        return Err(window.remaining(now));
    }

    window.hits += 1;
    WINDOWS.insert(key, window).await;
    Ok(policy.max_requests - window.hits)
}

fn too_many_requests(retry_after: Duration) -> HttpResponse {
    // 向上取整，至少 1 秒
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", secs.max(1).to_string()))
        .insert_header((REMAINING_HEADER, HeaderValue::from_static("0")))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: self.policy.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: Arc<Policy>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let key = counter_key(policy.scope, &req);

            match hit(key.clone(), &policy).await {
                Ok(remaining) => {
                    let mut res = srv.call(req).await?;
                    res.headers_mut()
                        .insert(REMAINING_HEADER, HeaderValue::from(remaining));
                    Ok(res.map_into_left_body())
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit hit for {} ({} requests per {}s)",
                        key,
                        policy.max_requests,
                        policy.window.as_secs()
                    );
                    Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as atest, web};

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.policy.max_requests, 5);
        assert_eq!(login.policy.window, Duration::from_secs(60));
        assert_eq!(RateLimit::bulk_import().policy.scope, "enrollment_import");
        assert_eq!(RateLimit::chat().policy.max_requests, 30);
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = atest::init_service(
            App::new()
                .wrap(RateLimit::new("unit_test_over_limit", 2, 60))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "1");
        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry: u64 = resp.headers().get("Retry-After").unwrap().to_str().unwrap().parse().unwrap();
        assert!((1..=60).contains(&retry));
    }

    #[actix_web::test]
    async fn test_window_resets_after_expiry() {
        let app = atest::init_service(
            App::new()
                .wrap(RateLimit::new("unit_test_reset", 1, 1))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let resp = atest::call_service(&app, atest::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
    }
}
