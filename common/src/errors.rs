use log::error;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 批量操作的逐条结果：成功的 id 与失败的 id（附带原因）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub id: String,
    pub message: String,
}

impl BulkReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.id.as_str()).collect()
    }

    /// 全部成功返回 Ok，否则包装成 PartialFailure
    pub fn into_result(self) -> Result<BulkReport, AppError> {
        if self.is_complete() { Ok(self) } else { Err(AppError::PartialFailure(self)) }
    }
}

impl fmt::Display for BulkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, failed: [{}]", self.succeeded.len(), self.failed_ids().join(", "))
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==== 校验错误（发生在网络请求之前） ====
    #[error("Bad request: {0}")]
    Validation(String),

    #[error("A reason is required for a non-permanent delete")]
    MissingReason,

    #[error("Invalid parent: {0}")]
    InvalidParent(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // ==== 传输错误 ====
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ==== 业务错误（success:false） ====
    #[error("{0}")]
    Api(String),

    #[error("Bulk operation partially failed: {0}")]
    PartialFailure(BulkReport),

    // ==== 系统错误 ====
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 是否为本地校验失败（未发出任何请求）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::MissingReason
                | AppError::InvalidParent(_)
                | AppError::NotFound(_)
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("参数验证失败: {}", e))
    }
}
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        error!("{:?}", e);
        match e.status() {
            Some(status) => AppError::Http { status: status.as_u16(), message: e.to_string() },
            None if e.is_decode() => AppError::Internal(format!("undecodable response: {}", e)),
            None => AppError::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_report_becomes_error() {
        let report = BulkReport {
            succeeded: vec!["x".into()],
            failed: vec![BulkFailure { id: "y".into(), message: "locked".into() }],
        };
        match report.into_result() {
            Err(AppError::PartialFailure(r)) => assert_eq!(r.failed_ids(), vec!["y"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn validation_kinds() {
        assert!(AppError::MissingReason.is_validation());
        assert!(AppError::InvalidParent("self".into()).is_validation());
        assert!(!AppError::Network("down".into()).is_validation());
        assert!(!AppError::Api("nope".into()).is_validation());
    }
}
