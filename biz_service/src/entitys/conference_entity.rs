use crate::entitys::{impl_entity, AuditInfo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConferenceStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// 会议
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: String,
    /// 会议名称
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 会场 id
    pub location_id: Option<String>,
    #[serde(default)]
    pub status: ConferenceStatus,
    #[serde(flatten)]
    pub audit: AuditInfo,
}
impl_entity!(Conference, "/conferences");

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_conference_dates"))]
pub struct ConferencePayload {
    #[validate(length(min = 1, max = 200, message = "会议名称长度 1-200"))]
    pub name: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location_id: Option<String>,
    pub status: ConferenceStatus,
}

fn validate_conference_dates(payload: &ConferencePayload) -> Result<(), ValidationError> {
    match (payload.start_date, payload.end_date) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}
