use crate::entitys::{impl_entity, AuditInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 会议下的工作坊
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: String,
    pub conference_id: String,
    pub title: String,
    pub summary: Option<String>,
    pub instructor_id: Option<String>,
    pub location_id: Option<String>,
    /// 名额
    #[serde(default)]
    pub capacity: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Workshop, "/workshops");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopPayload {
    #[validate(length(min = 1, message = "必须选择会议"))]
    pub conference_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub summary: Option<String>,
    pub instructor_id: Option<String>,
    pub location_id: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub capacity: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}
