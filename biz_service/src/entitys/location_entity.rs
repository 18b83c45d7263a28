use crate::entitys::{impl_entity, AuditInfo};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 会场 / 场地
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<u32>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Location, "/locations");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<u32>,
}
