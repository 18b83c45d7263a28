use crate::entitys::{impl_entity, AuditInfo};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default)]
    pub sequence: i32,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Faq, "/faqs");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct FaqPayload {
    #[validate(length(min = 1, max = 500))]
    pub question: String,
    #[validate(length(min = 1))]
    pub answer: String,
    pub category: Option<String>,
    pub sequence: i32,
}
