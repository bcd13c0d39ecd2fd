use serde::Deserialize;

use crate::utils::validate::validate_date;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// 把 YYYY-MM-DD 转成当天 00:00 UTC 的时间戳
pub fn parse_session_date(value: Option<&str>) -> Result<Option<i64>, &'static str> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => {
            let date = validate_date(v)?;
            Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()))
        }
    }
}

/// 解析并校验起止日期
pub fn parse_session_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<i64>, Option<i64>), &'static str> {
    let start = parse_session_date(start)?;
    let end = parse_session_date(end)?;
    if let (Some(s), Some(e)) = (start, end)
        && s >= e
    {
        return Err("Session start date must be before end date");
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_range() {
        let (start, end) = parse_session_range(Some("2024-09-01"), Some("2025-07-31")).unwrap();
        assert_eq!(start, Some(1_725_148_800));
        assert!(end.unwrap() > start.unwrap());
        assert_eq!(parse_session_range(None, Some("")).unwrap(), (None, None));
        assert!(parse_session_range(Some("2025-07-31"), Some("2024-09-01")).is_err());
        assert!(parse_session_range(Some("31/07/2025"), None).is_err());
    }
}
