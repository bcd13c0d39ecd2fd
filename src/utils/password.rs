//! Argon2id 口令哈希
//!
//! 新哈希使用 config.toml 中的成本参数；校验时参数取自哈希串本身，
//! 调整参数后旧口令仍可登录。

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::config::AppConfig;
use crate::errors::CampusError;

fn hasher() -> Result<Argon2<'static>, CampusError> {
    let cost = &AppConfig::get().argon2;
    let params = Params::new(cost.memory_cost, cost.time_cost, cost.parallelism, None)
        .map_err(|e| CampusError::internal(format!("Argon2 参数无效: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(password: &str) -> Result<String, CampusError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CampusError::internal(format!("密码哈希失败: {e}")))
}

/// 哈希串损坏时视为不匹配
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("CorrectHorse9").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("CorrectHorse9", &hash));
        assert!(!verify_password("WrongHorse9", &hash));
        assert!(!verify_password("CorrectHorse9", "not-a-hash"));
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let cheap = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        );
        let salt = SaltString::generate(&mut OsRng);
        let hash = cheap.hash_password(b"Legacy123", &salt).unwrap().to_string();
        assert!(verify_password("Legacy123", &hash));
    }
}
