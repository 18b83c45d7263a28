use crate::entitys::{impl_entity, AuditInfo};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 参会反馈
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub conference_id: Option<String>,
    pub workshop_id: Option<String>,
    pub author: Option<String>,
    /// 1-5 分
    pub rating: u8,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Feedback, "/feedbacks");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub conference_id: Option<String>,
    pub workshop_id: Option<String>,
    pub author: Option<String>,
    #[validate(range(min = 1, max = 5, message = "评分范围 1-5"))]
    pub rating: u8,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
