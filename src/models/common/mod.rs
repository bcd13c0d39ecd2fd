pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;

use serde::Serialize;

/// 批量操作中单条失败记录
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure<I> {
    pub item: I,
    pub error: String,
}

/// 批量操作结果：逐条处理，失败不影响后续条目
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<S, I> {
    pub successful: Vec<S>,
    pub failed: Vec<BatchFailure<I>>,
}

impl<S, I> Default for BatchResult<S, I> {
    fn default() -> Self {
        Self {
            successful: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<S, I> BatchResult<S, I> {
    pub fn push_ok(&mut self, value: S) {
        self.successful.push(value);
    }

    pub fn push_err(&mut self, item: I, error: impl Into<String>) {
        self.failed.push(BatchFailure {
            item,
            error: error.into(),
        });
    }

    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.successful.len(),
            self.failed.len()
        )
    }
}
