use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 学号：字母数字与 / - 组合，例如 CSC/2021/001
static MATRIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/-]{2,31}$").expect("Invalid matric regex"));

static STAFF_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/-]{1,31}$").expect("Invalid staff id regex"));

// 课程代码：2-5 个字母，可选空格，3-4 位数字，例如 CSC 301
static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,5} ?[0-9]{3,4}[A-Za-z]?$").expect("Invalid course code regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Full name is required");
    }
    if len > 128 {
        return Err("Full name must be at most 128 characters");
    }
    Ok(())
}

pub fn validate_matric_number(matric: &str) -> Result<(), &'static str> {
    if !MATRIC_RE.is_match(matric) {
        return Err("Matric number must be 3-32 letters, digits, '/' or '-'");
    }
    Ok(())
}

pub fn validate_staff_id(staff_id: &str) -> Result<(), &'static str> {
    if !STAFF_ID_RE.is_match(staff_id) {
        return Err("Staff ID must be 2-32 letters, digits, '/' or '-'");
    }
    Ok(())
}

pub fn validate_course_code(code: &str) -> Result<(), &'static str> {
    if !COURSE_CODE_RE.is_match(code) {
        return Err("Course code must look like 'CSC301' or 'CSC 301'");
    }
    Ok(())
}

/// 课程代码统一为大写、去掉首尾空白
pub fn normalize_course_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// 日期格式 YYYY-MM-DD
pub fn validate_date(date: &str) -> Result<chrono::NaiveDate, &'static str> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| "Date must be YYYY-MM-DD")
}

/// 时间格式 HH:MM
pub fn validate_time(time: &str) -> Result<chrono::NaiveTime, &'static str> {
    chrono::NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| "Time must be HH:MM")
}

/// 校验时间段，开始时间必须早于结束时间
pub fn validate_time_range(start: &str, end: &str) -> Result<(), &'static str> {
    let start = validate_time(start)?;
    let end = validate_time(end)?;
    if start >= end {
        return Err("Start time must be before end time");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 至少 8 个字符，包含大写字母、小写字母与数字，且不在常见弱密码列表中。
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "student1",
        "lecturer1",
        "abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_valid);
        let result = validate_password("Ab1");
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert!(!validate_password("abcd1234").is_valid);
        assert!(!validate_password("ABCD1234").is_valid);
        assert!(!validate_password("AbcdEfgh").is_valid);
        let result = validate_password("Password1");
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_identifiers() {
        assert!(validate_email("ada@uni.edu.ng").is_ok());
        assert!(validate_email("ada@uni").is_err());
        assert!(validate_matric_number("CSC/2021/001").is_ok());
        assert!(validate_matric_number("/bad").is_err());
        assert!(validate_staff_id("STF-0042").is_ok());
        assert!(validate_staff_id("").is_err());
        assert!(validate_course_code("CSC301").is_ok());
        assert!(validate_course_code("CSC 301").is_ok());
        assert!(validate_course_code("301CSC").is_err());
        assert_eq!(normalize_course_code(" csc301 "), "CSC301");
    }

    #[test]
    fn test_date_and_time() {
        assert!(validate_date("2025-02-28").is_ok());
        assert!(validate_date("2025-02-30").is_err());
        assert!(validate_time("09:00").is_ok());
        assert!(validate_time("25:00").is_err());
        assert!(validate_time_range("09:00", "11:00").is_ok());
        assert!(validate_time_range("11:00", "11:00").is_err());
        assert!(validate_time_range("12:00", "11:00").is_err());
    }
}
