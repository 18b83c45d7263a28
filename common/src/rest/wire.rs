use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 删除请求体：非永久删除必须填写原因
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_delete_reason"))]
pub struct DeleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,
}

impl DeleteRequest {
    pub fn new(reason: &str, permanent: bool) -> Self {
        let reason = reason.trim();
        Self {
            reason: if reason.is_empty() { None } else { Some(reason.to_string()) },
            permanent: if permanent { Some(true) } else { None },
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent.unwrap_or(false)
    }
}

fn validate_delete_reason(req: &DeleteRequest) -> Result<(), ValidationError> {
    let has_reason = req.reason.as_deref().is_some_and(|r| !r.trim().is_empty());
    if req.is_permanent() || has_reason {
        Ok(())
    } else {
        Err(ValidationError::new("missing_reason"))
    }
}

/// PUT .../restore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreRequest {
    pub ids: Vec<String>,
}

/// 兄弟节点交换顺序，两个节点与目标序号一次提交，由服务端事务处理
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwapSequenceRequest {
    pub id: String,
    /// id 节点的新序号
    pub sequence: f64,
    pub target_id: String,
    /// target_id 节点的新序号
    pub target_sequence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeParentRequest {
    pub parent_id: String,
}
