use crate::entitys::{impl_entity, AuditInfo};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 后台用户
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    /// 用户名（用于登录）
    pub user_name: String,
    pub email: Option<String>,
    /// 用户状态（true=启用, false=禁用/冻结）
    #[serde(default)]
    pub status: bool,
    /// 是否为管理员
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(UserInfo, "/users");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(custom(function = "validate_username"))]
    pub user_name: String,
    #[validate(email(message = "邮箱格式错误"))]
    pub email: Option<String>,
    pub status: bool,
    pub is_admin: bool,
    pub roles: Vec<String>,
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let len = value.len();

    // 长度限制
    if !(4..=20).contains(&len) {
        return Err(ValidationError::new("user.name.over.len"));
    }

    // 仅允许字母、数字、下划线
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("user.name.illegal.char"));
    }
    Ok(())
}
