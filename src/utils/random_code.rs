use rand::Rng;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";

/// 生成随机密码，保证至少包含大写、小写字母和数字各一个
pub fn generate_password(length: usize) -> String {
    let length = length.max(8);
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..length)
            .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
            .collect();
        if candidate.chars().any(|c| c.is_ascii_uppercase())
            && candidate.chars().any(|c| c.is_ascii_lowercase())
            && candidate.chars().any(|c| c.is_ascii_digit())
        {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let pwd = generate_password(16);
            assert_eq!(pwd.len(), 16);
            assert!(validate_password(&pwd).is_valid, "{pwd}");
        }
    }

    #[test]
    fn test_minimum_length() {
        assert_eq!(generate_password(3).len(), 8);
    }
}
