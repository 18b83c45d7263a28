use chrono::{DateTime, Local, Utc};

/// 审计时间转本地时间字符串，用于列表展示
pub fn time_to_str(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn opt_time_to_str(time: Option<&DateTime<Utc>>) -> String {
    time.map(time_to_str).unwrap_or_else(|| "-".to_string())
}
