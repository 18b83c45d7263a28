use crate::entitys::{impl_entity, AuditInfo};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 讲师
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Instructor, "/instructors");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct InstructorPayload {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email(message = "邮箱格式错误"))]
    pub email: Option<String>,
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}
