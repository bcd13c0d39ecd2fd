//! 访问令牌与刷新令牌
//!
//! 两种令牌用同一密钥签名，靠 `token_type` 声明区分，互相不能冒用。
//! 浏览器端同时下发 HttpOnly Cookie，API 客户端使用 `Authorization: Bearer`。

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::header::AUTHORIZATION;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub role: String,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub.parse().map_err(|_| ErrorKind::InvalidToken.into())
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn sign(user_id: i64, role: &str, kind: TokenKind, lifetime: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + lifetime).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let key = EncodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        encode(&Header::default(), &claims, &key)
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;
        if claims.token_type != expected {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    /// `lifetime` 为空时使用 config.toml 中的有效期
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        lifetime: Option<Duration>,
    ) -> Result<String, JwtError> {
        let lifetime =
            lifetime.unwrap_or_else(|| Duration::minutes(AppConfig::get().jwt.access_token_expiry));
        Self::sign(user_id, role, TokenKind::Access, lifetime)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: Self::sign(user_id, role, TokenKind::Access, access_lifetime)?,
            refresh_token: Self::sign(user_id, role, TokenKind::Refresh, refresh_lifetime)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// Authorization 头优先，其次 `token` Cookie
    pub fn extract_access_token(req: &HttpRequest) -> Option<String> {
        pick_access_token(
            req.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()),
            req.cookie(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()),
        )
    }

    pub fn extract_refresh_token(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn access_token_cookie(token: &str, minutes: i64) -> Cookie<'static> {
        auth_cookie(ACCESS_TOKEN_COOKIE, token, CookieDuration::minutes(minutes), SameSite::Lax)
    }

    /// 刷新令牌只在刷新接口使用，SameSite 取 Strict
    pub fn refresh_token_cookie(token: &str, days: i64) -> Cookie<'static> {
        auth_cookie(REFRESH_TOKEN_COOKIE, token, CookieDuration::days(days), SameSite::Strict)
    }

    /// 注销时下发的过期 Cookie
    pub fn cleared_cookies() -> [Cookie<'static>; 2] {
        [
            auth_cookie(ACCESS_TOKEN_COOKIE, "", CookieDuration::ZERO, SameSite::Lax),
            Self::cleared_refresh_cookie(),
        ]
    }

    pub fn cleared_refresh_cookie() -> Cookie<'static> {
        auth_cookie(REFRESH_TOKEN_COOKIE, "", CookieDuration::ZERO, SameSite::Strict)
    }
}

fn auth_cookie(
    name: &'static str,
    value: &str,
    max_age: CookieDuration,
    same_site: SameSite,
) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .path("/")
        .max_age(max_age)
        .same_site(same_site)
        .http_only(true)
        .secure(AppConfig::get().is_production())
        .finish()
}

fn pick_access_token(authorization: Option<&str>, cookie: Option<String>) -> Option<String> {
    authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| cookie.filter(|token| !token.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_source_precedence() {
        assert_eq!(
            pick_access_token(Some("Bearer abc"), Some("def".into())),
            Some("abc".to_string())
        );
        assert_eq!(pick_access_token(None, Some("def".into())), Some("def".to_string()));
        assert_eq!(
            pick_access_token(Some("Basic xyz"), Some("def".into())),
            Some("def".to_string())
        );
        assert_eq!(pick_access_token(Some("Bearer "), None), None);
        assert_eq!(pick_access_token(None, Some(String::new())), None);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let pair =
            JwtUtils::generate_token_pair(7, "lecturer", Duration::minutes(5), Duration::days(1))
                .unwrap();
        let claims = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.role, "lecturer");
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::generate_access_token(1, "admin", Some(Duration::minutes(-5))).unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }
}
