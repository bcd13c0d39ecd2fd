use crate::models::common::PaginationQuery;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppointCourseRepRequest {
    pub student_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

impl SendMessageRequest {
    pub fn validate(&self, max_length: usize) -> Result<&str, String> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err("Message content is required".to_string());
        }
        if content.chars().count() > max_length {
            return Err(format!("Message must be at most {max_length} characters"));
        }
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatHistoryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_validation() {
        let req = SendMessageRequest {
            content: "  hello  ".into(),
        };
        assert_eq!(req.validate(10).unwrap(), "hello");
        assert!(SendMessageRequest { content: "   ".into() }.validate(10).is_err());
        assert!(SendMessageRequest { content: "x".repeat(11) }.validate(10).is_err());
    }
}
